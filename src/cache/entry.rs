//! Cache Entry Module
//!
//! Defines the entry type classes and the structure for individual cache
//! entries with their expiry and access bookkeeping.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Entry Type ==
/// Volatility class of a cached value. Decides the TTL at insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Live feeds, 10 seconds
    Critical,
    /// Regular computed data, 30 seconds
    #[default]
    Standard,
    /// Past snapshots, 5 minutes
    Historical,
    /// Slow-changing reference data, 1 hour
    Static,
}

impl EntryType {
    pub const ALL: [EntryType; 4] = [
        EntryType::Critical,
        EntryType::Standard,
        EntryType::Historical,
        EntryType::Static,
    ];

    /// Time-to-live for entries of this type.
    pub const fn ttl(self) -> Duration {
        match self {
            EntryType::Critical => Duration::from_secs(10),
            EntryType::Standard => Duration::from_secs(30),
            EntryType::Historical => Duration::from_secs(5 * 60),
            EntryType::Static => Duration::from_secs(60 * 60),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EntryType::Critical => "critical",
            EntryType::Standard => "standard",
            EntryType::Historical => "historical",
            EntryType::Static => "static",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CacheError::UnknownEntryType(s.to_string()))
    }
}

// == Cache Entry ==
/// Represents a single cache entry with its payload and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// Lookup key, kept for introspection
    pub key: String,
    /// The stored payload
    pub data: T,
    /// Declared volatility class
    pub entry_type: EntryType,
    /// Start of the TTL window (Unix milliseconds)
    pub created_at: u64,
    /// Resolved once from `entry_type` at insertion
    pub ttl: Duration,
    /// Successful reads since insertion
    pub access_count: u64,
    /// Last successful read or insertion (Unix milliseconds)
    pub last_accessed_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry whose TTL window starts at `now_ms`.
    pub fn new(key: String, data: T, entry_type: EntryType, now_ms: u64) -> Self {
        Self {
            key,
            data,
            entry_type,
            created_at: now_ms,
            ttl: entry_type.ttl(),
            access_count: 0,
            last_accessed_at: now_ms,
        }
    }

    fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    fn ttl_ms(&self) -> u64 {
        self.ttl.as_millis() as u64
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is still alive when its age equals the
    /// TTL exactly and dead one millisecond later.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) > self.ttl_ms()
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or 0 once the window has elapsed.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.ttl_ms().saturating_sub(self.age_ms(now_ms))
    }

    /// Records a successful read.
    pub(crate) fn record_access(&mut self, now_ms: u64) {
        self.access_count += 1;
        self.last_accessed_at = now_ms;
    }
}
