//! Cache Module
//!
//! In-memory caching with type-aware TTL expiration, LRU eviction,
//! targeted invalidation and hit/miss statistics.

mod clock;
mod codec;
mod entry;
mod keys;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, MockClock, SystemClock};
pub use codec::{PassthroughCodec, PayloadCodec};
pub use entry::{CacheEntry, EntryType};
pub use keys::build_key;
pub use lru::LruTracker;
pub use stats::{CacheStats, KeyAccess, StatsRecorder, MAX_ACCESS_SAMPLES, TOP_KEYS};
pub use store::CacheStore;
