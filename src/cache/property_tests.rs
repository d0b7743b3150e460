//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check expiry, eviction and statistics invariants over
//! random operation sequences on a mock clock.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, Clock, EntryType, MockClock};
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

fn new_store(max_entries: usize) -> (CacheStore<String>, MockClock) {
    let clock = MockClock::new(0);
    let config = CacheConfig::default().with_max_entries(max_entries);
    let store = CacheStore::with_clock(config, Arc::new(clock.clone())).unwrap();
    (store, clock)
}

// == Strategies ==
/// Generates valid cache keys in the `<namespace>:<id>` shape
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}:[A-Z0-9]{1,6}"
}

fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop::sample::select(EntryType::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, entry_type: EntryType },
    Get { key: String },
    Has { key: String },
    Advance { millis: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), entry_type_strategy())
            .prop_map(|(key, entry_type)| CacheOp::Set { key, entry_type }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Has { key }),
        (0u64..20_000).prop_map(|millis| CacheOp::Advance { millis }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hit/miss counters match what the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut store, clock) = new_store(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, entry_type } => store.set(key.clone(), key, entry_type),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Has { key } => {
                    store.has(&key);
                }
                CacheOp::Advance { millis } => clock.advance(Duration::from_millis(millis)),
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total_hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.total_misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // A value is returned exactly while its age is within the TTL of its type.
    #[test]
    fn prop_ttl_window(
        key in valid_key_strategy(),
        entry_type in entry_type_strategy(),
        offset_ms in 0u64..4_000_000,
    ) {
        let (mut store, clock) = new_store(TEST_MAX_ENTRIES);
        store.set(key.clone(), "payload".to_string(), entry_type);

        clock.set(offset_ms);
        let alive = offset_ms <= entry_type.ttl().as_millis() as u64;
        prop_assert_eq!(store.get(&key).is_some(), alive);
        prop_assert_eq!(store.len(), usize::from(alive));
    }

    // The number of entries never exceeds the cap.
    #[test]
    fn prop_capacity_enforcement(
        keys in prop::collection::vec(valid_key_strategy(), 1..200)
    ) {
        let max_entries = 50;
        let (mut store, _) = new_store(max_entries);

        for key in keys {
            store.set(key.clone(), key, EntryType::Standard);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }

    // Sweep leaves exactly the live entries behind.
    #[test]
    fn prop_sweep_keeps_only_live(
        entries in prop::collection::vec((valid_key_strategy(), entry_type_strategy()), 1..40),
        elapsed_ms in 0u64..400_000,
    ) {
        let (mut store, clock) = new_store(TEST_MAX_ENTRIES);
        let mut latest: HashMap<String, EntryType> = HashMap::new();
        for (key, entry_type) in entries {
            store.set(key.clone(), key.clone(), entry_type);
            latest.insert(key, entry_type);
        }

        clock.set(elapsed_ms);
        store.sweep_expired();

        let expected: HashSet<String> = latest
            .into_iter()
            .filter(|(_, t)| elapsed_ms <= t.ttl().as_millis() as u64)
            .map(|(k, _)| k)
            .collect();
        let actual: HashSet<String> = store.keys().map(str::to_string).collect();
        prop_assert_eq!(actual, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With reads interleaved, the (N+1)-th insert evicts the key whose last
    // access is oldest.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 2..10),
        reads in prop::collection::vec(0usize..10, 0..20),
        new_key in valid_key_strategy(),
    ) {
        let mut unique_keys: Vec<String> = Vec::new();
        for key in initial_keys {
            if !unique_keys.contains(&key) {
                unique_keys.push(key);
            }
        }
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let (mut store, clock) = new_store(capacity);
        let mut last_access: HashMap<String, u64> = HashMap::new();

        for key in &unique_keys {
            clock.advance(Duration::from_millis(1));
            store.set(key.clone(), key.clone(), EntryType::Static);
            last_access.insert(key.clone(), clock.now_ms());
        }
        for index in reads {
            let key = &unique_keys[index % capacity];
            clock.advance(Duration::from_millis(1));
            prop_assert!(store.get(key).is_some());
            last_access.insert(key.clone(), clock.now_ms());
        }

        let victim = last_access
            .iter()
            .min_by_key(|(_, at)| **at)
            .map(|(k, _)| k.clone())
            .unwrap();

        clock.advance(Duration::from_millis(1));
        store.set(new_key.clone(), new_key.clone(), EntryType::Static);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.has(&victim), "Victim '{}' should have been evicted", victim);
        prop_assert!(store.has(&new_key));
        for key in unique_keys.iter().filter(|k| **k != victim) {
            prop_assert!(store.has(key), "Key '{}' should still exist", key);
        }
    }
}
