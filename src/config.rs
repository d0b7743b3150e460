//! Configuration Module
//!
//! Tuning for a cache instance, fixed at construction.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default entry cap for a standalone store.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Entry cap for the application-wide shared instance.
pub const SHARED_MAX_ENTRIES: usize = 2000;

/// Default interval between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Hard cap on the number of entries
    pub max_entries: usize,
    /// How often the background sweep removes expired entries
    pub sweep_interval: Duration,
    /// Whether hit/miss/latency counters are maintained
    pub stats_enabled: bool,
    /// Whether payloads pass through the codec hook
    pub compression_enabled: bool,
}

impl CacheConfig {
    /// Configuration for the instance shared across application modules.
    pub fn shared() -> Self {
        Self {
            max_entries: SHARED_MAX_ENTRIES,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    /// - `CACHE_STATS_ENABLED` - `true`/`false` (default: true)
    /// - `CACHE_COMPRESSION_ENABLED` - `true`/`false` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_parse("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            sweep_interval: env_parse("CACHE_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            stats_enabled: env_parse("CACHE_STATS_ENABLED").unwrap_or(defaults.stats_enabled),
            compression_enabled: env_parse("CACHE_COMPRESSION_ENABLED")
                .unwrap_or(defaults.compression_enabled),
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.stats_enabled = enabled;
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression_enabled = enabled;
        self
    }

    /// Rejects configurations the store cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than 0".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            stats_enabled: true,
            compression_enabled: false,
        }
    }
}

fn env_parse<V: std::str::FromStr>(name: &str) -> Option<V> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
