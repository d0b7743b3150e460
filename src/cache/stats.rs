//! Cache Statistics Module
//!
//! Running hit/miss/eviction counters plus the derived snapshot handed to
//! callers.

use serde::Serialize;

/// Sample list length that triggers truncation of the oldest half.
pub const MAX_ACCESS_SAMPLES: usize = 1000;

/// Number of keys reported in `most_accessed_keys`.
pub const TOP_KEYS: usize = 10;

// == Stats Recorder ==
/// Mutable counters owned by the store.
#[derive(Debug, Clone, Default)]
pub struct StatsRecorder {
    hits: u64,
    misses: u64,
    evictions: u64,
    /// Lookup latencies in milliseconds, oldest first
    access_times_ms: Vec<f64>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Counts a hit and keeps its lookup latency as a sample.
    pub fn record_hit(&mut self, elapsed_ms: f64) {
        self.hits += 1;
        self.access_times_ms.push(elapsed_ms);
        if self.access_times_ms.len() > MAX_ACCESS_SAMPLES {
            let half = self.access_times_ms.len() / 2;
            self.access_times_ms.drain(..half);
        }
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    #[cfg(test)]
    pub(crate) fn sample_count(&self) -> usize {
        self.access_times_ms.len()
    }

    // == Hit Rate ==
    /// Hits as a percentage of all lookups, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    pub fn average_access_time_ms(&self) -> f64 {
        if self.access_times_ms.is_empty() {
            0.0
        } else {
            self.access_times_ms.iter().sum::<f64>() / self.access_times_ms.len() as f64
        }
    }
}

// == Key Access ==
/// A key and how many times it has been read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyAccess {
    pub key: String,
    pub access_count: u64,
}

// == Cache Stats ==
/// Point-in-time statistics snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Hits / (hits + misses) as a percentage
    pub hit_rate: f64,
    pub total_hits: u64,
    pub total_misses: u64,
    /// Entries removed by LRU eviction
    pub total_evictions: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Approximate bytes held by keys and payloads
    pub memory_usage_estimate: usize,
    pub average_access_time_ms: f64,
    /// Top keys by access count, descending
    pub most_accessed_keys: Vec<KeyAccess>,
}

/// Orders keys by access count descending, ties by key, and keeps the top ten.
pub(crate) fn top_accessed(mut keys: Vec<KeyAccess>) -> Vec<KeyAccess> {
    keys.sort_by(|a, b| {
        b.access_count
            .cmp(&a.access_count)
            .then_with(|| a.key.cmp(&b.key))
    });
    keys.truncate(TOP_KEYS);
    keys
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_new() {
        let stats = StatsRecorder::new();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
        assert_eq!(stats.evictions(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.average_access_time_ms(), 0.0);
    }

    #[test]
    fn test_hit_rate_is_percentage() {
        let mut stats = StatsRecorder::new();
        for _ in 0..3 {
            stats.record_hit(0.0);
        }
        stats.record_miss();
        stats.record_miss();

        assert!((stats.hit_rate() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_access_time() {
        let mut stats = StatsRecorder::new();
        stats.record_hit(1.0);
        stats.record_hit(3.0);

        assert!((stats.average_access_time_ms() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_samples_truncate_oldest_half() {
        let mut stats = StatsRecorder::new();
        for i in 0..=MAX_ACCESS_SAMPLES {
            stats.record_hit(i as f64);
        }

        // 1001 samples -> drop the oldest 500
        assert_eq!(stats.sample_count(), MAX_ACCESS_SAMPLES + 1 - 500);
        assert_eq!(stats.hits(), MAX_ACCESS_SAMPLES as u64 + 1);
        assert!(stats.average_access_time_ms() > 500.0);
    }

    #[test]
    fn test_record_eviction() {
        let mut stats = StatsRecorder::new();
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.evictions(), 2);
    }

    #[test]
    fn test_top_accessed_order_and_limit() {
        let keys = (0..15)
            .map(|i| KeyAccess {
                key: format!("country:{i:02}"),
                access_count: i % 5,
            })
            .collect();

        let top = top_accessed(keys);
        assert_eq!(top.len(), TOP_KEYS);
        assert_eq!(top[0].access_count, 4);
        assert_eq!(top[0].key, "country:04");
        assert!(top.windows(2).all(|w| w[0].access_count >= w[1].access_count));
    }
}
