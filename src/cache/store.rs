//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, type-aware
//! TTL expiration, targeted invalidation and statistics.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::stats::top_accessed;
use crate::cache::{
    CacheEntry, CacheStats, Clock, EntryType, KeyAccess, LruTracker, PassthroughCodec,
    PayloadCodec, StatsRecorder, SystemClock,
};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache Store ==
/// Single-owner cache storage with LRU eviction and TTL support.
///
/// Every operation runs to completion under `&mut self`, so a store behind a
/// lock is mutually exclusive per call. See [`crate::SharedCache`] for the
/// shared, swept variant.
pub struct CacheStore<T> {
    entries: HashMap<String, CacheEntry<T>>,
    lru: LruTracker,
    stats: StatsRecorder,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    codec: Box<dyn PayloadCodec<T>>,
    /// Set by `close`; writes are refused from then on
    closed: bool,
}

impl<T> fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("len", &self.entries.len())
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<T> CacheStore<T> {
    // == Constructor ==
    /// Creates a store on the system clock.
    ///
    /// Fails if the configuration is invalid (e.g. `max_entries == 0`).
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: HashMap::with_capacity(config.max_entries.min(1024)),
            lru: LruTracker::new(),
            stats: StatsRecorder::new(),
            config,
            clock,
            codec: Box::new(PassthroughCodec),
            closed: false,
        })
    }

    /// Replaces the payload codec. Only consulted when compression is enabled.
    pub fn with_codec(mut self, codec: impl PayloadCodec<T> + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn encode(&self, data: T) -> T {
        if self.config.compression_enabled {
            self.codec.compress(data)
        } else {
            data
        }
    }

    fn decode(&self, data: T) -> T {
        if self.config.compression_enabled {
            self.codec.decompress(data)
        } else {
            data
        }
    }

    // == Set ==
    /// Stores `data` under `key` with the TTL of `entry_type`.
    ///
    /// Overwriting restarts the TTL window and resets the access count.
    /// Inserting a new key into a full store first evicts the least recently
    /// used entry.
    pub fn set(&mut self, key: impl Into<String>, data: T, entry_type: EntryType) {
        let key = key.into();
        if self.closed {
            warn!(key = %key, "Ignoring set on closed cache");
            return;
        }
        if key.is_empty() {
            warn!("Ignoring set with empty key");
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_entries {
            self.evict_lru();
        }

        let now = self.clock.now_ms();
        let data = self.encode(data);
        self.entries
            .insert(key.clone(), CacheEntry::new(key.clone(), data, entry_type, now));
        self.lru.touch(&key);
    }

    /// Applies [`set`](Self::set) to each tuple in order.
    pub fn set_batch<K, I>(&mut self, items: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T, EntryType)>,
    {
        for (key, data, entry_type) in items {
            self.set(key, data, entry_type);
        }
    }

    // == Get ==
    /// Retrieves the payload for `key`.
    ///
    /// Returns `None` on a miss. An expired entry is removed and counted as a
    /// miss. A hit bumps the access count and LRU recency but never extends
    /// the TTL.
    pub fn get(&mut self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let started = Instant::now();
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get_mut(key) else {
            self.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            self.remove_entry(key);
            debug!(key, "Lazily expired entry on get");
            self.record_miss();
            return None;
        }

        entry.record_access(now);
        let data = entry.data.clone();
        self.lru.touch(key);

        let data = self.decode(data);
        self.record_hit(started.elapsed());
        Some(data)
    }

    // == Has ==
    /// Reports whether `key` holds a live entry, without touching statistics
    /// or LRU order. An expired entry is removed.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                self.remove_entry(key);
                debug!(key, "Lazily expired entry on has");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == Update ==
    /// Replaces the payload of an existing entry and restarts its TTL window.
    ///
    /// Expiry is not checked: a dead-but-present entry is revived. Returns
    /// `false` if the key is absent.
    pub fn update(&mut self, key: &str, data: T) -> bool {
        if self.closed {
            warn!(key, "Ignoring update on closed cache");
            return false;
        }
        if !self.entries.contains_key(key) {
            return false;
        }

        let now = self.clock.now_ms();
        let data = self.encode(data);
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.data = data;
                entry.created_at = now;
                entry.access_count += 1;
                true
            }
            None => false,
        }
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Read-through ==
    /// Returns the cached value for `key`, or computes, stores and returns it.
    ///
    /// An error from `compute` is returned unchanged and nothing is cached.
    pub fn get_or_insert_with<E, F>(
        &mut self,
        key: &str,
        compute: F,
        entry_type: EntryType,
    ) -> std::result::Result<T, E>
    where
        T: Clone,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key, value.clone(), entry_type);
        Ok(value)
    }

    // == Eviction ==
    fn evict_lru(&mut self) {
        while let Some(victim) = self.lru.pop_least_recent() {
            if self.entries.remove(&victim).is_some() {
                if self.config.stats_enabled {
                    self.stats.record_eviction();
                }
                debug!(key = %victim, "Evicted least recently used entry");
                return;
            }
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.lru.remove(key);
        }
        removed
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&CacheEntry<T>) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .values()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }

    // == Sweep Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.remove_where(|entry| entry.is_expired_at(now))
    }

    // == Invalidation ==
    /// Removes every key containing `entity_id`.
    ///
    /// Substring matching covers `country:<id>`, `intelligence:<id>:vitality`
    /// and any other namespace convention. An empty id matches nothing.
    pub fn invalidate_by_entity(&mut self, entity_id: &str) -> usize {
        if entity_id.is_empty() {
            return 0;
        }
        let removed = self.remove_where(|entry| entry.key.contains(entity_id));
        debug!(entity_id, removed, "Invalidated entries by entity");
        removed
    }

    /// Removes every key matching `pattern`.
    pub fn invalidate_by_pattern(&mut self, pattern: &Regex) -> usize {
        let removed = self.remove_where(|entry| pattern.is_match(&entry.key));
        debug!(pattern = %pattern, removed, "Invalidated entries by pattern");
        removed
    }

    /// Compiles `pattern` and removes every key it matches.
    pub fn invalidate_by_pattern_str(&mut self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern)?;
        Ok(self.invalidate_by_pattern(&regex))
    }

    /// Removes every entry declared with `entry_type`.
    pub fn invalidate_by_type(&mut self, entry_type: EntryType) -> usize {
        let removed = self.remove_where(|entry| entry.entry_type == entry_type);
        debug!(%entry_type, removed, "Invalidated entries by type");
        removed
    }

    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Close ==
    /// Clears the store and refuses every later write. Idempotent.
    pub fn close(&mut self) {
        self.closed = true;
        self.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // == Introspection ==
    /// Live entries whose remaining TTL is in `(0, within]`, soonest first.
    pub fn expiring_entries(&self, within: Duration) -> Vec<CacheEntry<T>>
    where
        T: Clone,
    {
        let now = self.clock.now_ms();
        let within_ms = within.as_millis() as u64;

        let mut expiring: Vec<CacheEntry<T>> = self
            .entries
            .values()
            .filter(|entry| {
                let remaining = entry.remaining_ms(now);
                remaining > 0 && remaining <= within_ms
            })
            .cloned()
            .map(|mut entry| {
                entry.data = self.decode(entry.data);
                entry
            })
            .collect();

        expiring.sort_by_key(|entry| entry.remaining_ms(now));
        expiring
    }

    /// Keys currently stored, including expired entries not yet swept.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Computes a statistics snapshot.
    pub fn stats(&self) -> CacheStats
    where
        T: Serialize,
    {
        let most_accessed_keys = top_accessed(
            self.entries
                .values()
                .map(|entry| KeyAccess {
                    key: entry.key.clone(),
                    access_count: entry.access_count,
                })
                .collect(),
        );

        CacheStats {
            hit_rate: self.stats.hit_rate(),
            total_hits: self.stats.hits(),
            total_misses: self.stats.misses(),
            total_evictions: self.stats.evictions(),
            total_entries: self.entries.len(),
            memory_usage_estimate: self.entries.values().map(estimate_size).sum(),
            average_access_time_ms: self.stats.average_access_time_ms(),
            most_accessed_keys,
        }
    }

    fn record_hit(&mut self, elapsed: Duration) {
        if self.config.stats_enabled {
            self.stats.record_hit(elapsed.as_secs_f64() * 1000.0);
        }
    }

    fn record_miss(&mut self) {
        if self.config.stats_enabled {
            self.stats.record_miss();
        }
    }
}

/// Two bytes per character of key and JSON-encoded payload.
fn estimate_size<T: Serialize>(entry: &CacheEntry<T>) -> usize {
    let payload = serde_json::to_vec(&entry.data).map_or(0, |bytes| bytes.len());
    (entry.key.len() + payload) * 2
}
