//! LRU Tracker Module
//!
//! Recency order of cache keys for least-recently-used eviction.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access recency of keys.
///
/// Keys are held oldest-first: the front is the least recently accessed key,
/// the back the most recent. Each key appears at most once. Touching a key is
/// equivalent to setting its `last_accessed_at` to now, so the front is always
/// the entry with the smallest `last_accessed_at`, ties going to the key that
/// reached that timestamp first.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks `key` as the most recently accessed.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Stops tracking `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently accessed key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// The next eviction candidate, without removing it.
    #[cfg(test)]
    pub(crate) fn least_recent(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
