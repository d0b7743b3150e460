//! Intel Cache - in-memory intelligence cache
//!
//! Type-aware TTL expiration, LRU eviction, pattern/type/entity
//! invalidation and hit/miss statistics for computed intelligence data.

pub mod cache;
pub mod config;
pub mod error;
pub mod shared;
pub mod tasks;

pub use cache::{build_key, CacheEntry, CacheStats, CacheStore, EntryType};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use shared::SharedCache;
pub use tasks::spawn_sweep_task;
