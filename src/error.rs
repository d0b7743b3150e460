//! Error types for the intelligence cache
//!
//! Provides unified error handling using thiserror. Lookups never fail; a
//! miss is `None`. Errors only surface from construction and from
//! caller-supplied input that has to be parsed.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Configuration rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalidation pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Entry type name not one of critical, standard, historical, static
    #[error("Unknown entry type: {0}")]
    UnknownEntryType(String),
}

impl From<regex::Error> for CacheError {
    fn from(err: regex::Error) -> Self {
        CacheError::InvalidPattern(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidConfig("max_entries must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_entries must be greater than 0"
        );

        let err = CacheError::UnknownEntryType("volatile".to_string());
        assert_eq!(err.to_string(), "Unknown entry type: volatile");
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: CacheError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, CacheError::InvalidPattern(_)));
    }
}
