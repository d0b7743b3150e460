//! Key construction convention.
//!
//! Keys take the form `<namespace>:<id>` or `<namespace>:<id>:<suffix>`.
//! Entity invalidation matches on the id, so callers that build keys here
//! can flush everything cached about one entity at once.

/// Builds a cache key from its parts.
pub fn build_key(namespace: &str, id: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{namespace}:{id}:{suffix}"),
        None => format!("{namespace}:{id}"),
    }
}
