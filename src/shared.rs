//! Shared Cache Handle
//!
//! Cloneable handle to one cache instance shared across tasks, with the
//! expiry sweep running in the background.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheEntry, CacheStats, CacheStore, Clock, EntryType, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::spawn_sweep_task;

/// Thread-safe cache handle.
///
/// Each method holds the store lock for exactly one store operation. Clones
/// refer to the same store. Construct one per application context and pass
/// it to the modules that need it.
#[derive(Debug)]
pub struct SharedCache<T> {
    /// The store; also carries the terminal closed flag
    store: Arc<RwLock<CacheStore<T>>>,
    /// Sweep task handle, taken on destroy
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<T> Clone for SharedCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<T> SharedCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates the cache on the system clock and starts its sweep task.
    ///
    /// Must be called from within a Tokio runtime. Fails if the configuration
    /// is invalid.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates the cache reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self::from_store(CacheStore::with_clock(config, clock)?))
    }

    /// Wraps an already configured store and starts its sweep task.
    ///
    /// # Arguments
    /// * `store` - The store to share; its `sweep_interval` drives the sweep
    pub fn from_store(store: CacheStore<T>) -> Self {
        let interval = store.config().sweep_interval;
        let max_entries = store.config().max_entries;
        let store = Arc::new(RwLock::new(store));
        let sweeper = spawn_sweep_task(Arc::clone(&store), interval);
        info!(max_entries, "Shared cache initialized");

        Self {
            store,
            sweeper: Arc::new(Mutex::new(Some(sweeper))),
        }
    }

    /// Whether `destroy` has been called on any clone of this handle.
    pub async fn is_destroyed(&self) -> bool {
        self.store.read().await.is_closed()
    }

    // == Writes ==
    /// Stores `data` under `key` with the TTL of `entry_type`.
    ///
    /// Ignored once the cache is destroyed.
    pub async fn set(&self, key: impl Into<String>, data: T, entry_type: EntryType) {
        self.store.write().await.set(key, data, entry_type);
    }

    /// Stores each tuple in order, one store operation per item.
    ///
    /// Items that arrive after a concurrent `destroy` are dropped.
    pub async fn set_batch<K, I>(&self, items: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T, EntryType)>,
    {
        for (key, data, entry_type) in items {
            self.store.write().await.set(key, data, entry_type);
        }
    }

    /// Replaces the payload of an existing entry and restarts its TTL window.
    /// Returns `false` if the key is absent or the cache is destroyed.
    pub async fn update(&self, key: &str, data: T) -> bool {
        self.store.write().await.update(key, data)
    }

    /// Removes `key`. Returns whether an entry was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    // == Reads ==
    /// Retrieves the payload for `key`; `None` on a miss or expiry.
    pub async fn get(&self, key: &str) -> Option<T> {
        self.store.write().await.get(key)
    }

    /// Reports whether `key` holds a live entry without touching statistics
    /// or LRU order.
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    // == Invalidation ==
    /// Removes every key containing `entity_id`. Returns the count removed.
    pub async fn invalidate_by_entity(&self, entity_id: &str) -> usize {
        self.store.write().await.invalidate_by_entity(entity_id)
    }

    /// Removes every key matching `pattern`. Returns the count removed.
    pub async fn invalidate_by_pattern(&self, pattern: &Regex) -> usize {
        self.store.write().await.invalidate_by_pattern(pattern)
    }

    /// Removes every entry declared with `entry_type`. Returns the count removed.
    pub async fn invalidate_by_type(&self, entry_type: EntryType) -> usize {
        self.store.write().await.invalidate_by_type(entry_type)
    }

    /// Removes every entry, keeping statistics.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Introspection ==
    /// Live entries whose remaining TTL falls in `(0, within]`, soonest first.
    pub async fn expiring_entries(&self, within: Duration) -> Vec<CacheEntry<T>> {
        self.store.read().await.expiring_entries(within)
    }

    /// Current statistics snapshot.
    pub async fn stats(&self) -> CacheStats
    where
        T: Serialize,
    {
        self.store.read().await.stats()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Read-through ==
    /// Returns the cached value for `key`, or awaits `compute`, caches its
    /// result under `entry_type` and returns it.
    ///
    /// The lock is released while `compute` runs. Concurrent misses on the
    /// same key each run `compute`; the last write wins. An error from
    /// `compute` is returned unchanged and nothing is cached.
    pub async fn get_with_fallback<E, F, Fut>(
        &self,
        key: &str,
        compute: F,
        entry_type: EntryType,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = compute().await?;
        self.set(key, value.clone(), entry_type).await;
        Ok(value)
    }

    // == Destroy ==
    /// Stops the sweep task, removes every entry and refuses later writes.
    ///
    /// Terminal for every clone of this handle. Calling it again is a no-op.
    pub async fn destroy(&self) {
        if let Some(sweeper) = self.sweeper.lock().await.take() {
            sweeper.abort();
            info!("Shared cache destroyed");
        }
        self.store.write().await.close();
    }
}
