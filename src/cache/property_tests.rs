//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against its correctness properties.

use proptest::prelude::*;
use std::collections::HashSet;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{CacheItem, CacheStore};

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;
const TEST_DEFAULT_TTL: Option<Duration> = Some(Duration::from_secs(300));

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates keys from a small alphabet so operations collide often
fn narrow_key_strategy() -> impl Strategy<Value = String> {
    "[a-e]"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}"
}

/// A single cache operation for sequence testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (narrow_key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        narrow_key_strategy().prop_map(|key| CacheOp::Get { key }),
        narrow_key_strategy().prop_map(|key| CacheOp::Has { key }),
        narrow_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

/// Deduplicates keys while keeping their first-seen order
fn unique_in_order(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

/// Reference LRU model: a Vec ordered oldest first
#[derive(Default)]
struct ModelCache {
    entries: Vec<(String, u32)>,
}

impl ModelCache {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn set(&mut self, key: String, value: u32, max_size: usize) {
        if let Some(pos) = self.position(&key) {
            self.entries.remove(pos);
        }
        self.entries.push((key, value));
        while self.entries.len() > max_size {
            self.entries.remove(0);
        }
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let pos = self.position(key)?;
        let entry = self.entries.remove(pos);
        let value = entry.1;
        self.entries.push(entry);
        Some(value)
    }

    fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn delete(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            self.entries.remove(pos);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // **Property 1: Round-trip**
    // Storing a value and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        store.set(&key, value.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // **Property 2: Overwrite**
    // A second set on the same key replaces the value without growing the cache.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        store.set(&key, value1, None);
        store.set(&key, value2.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // **Property 3: Delete and has**
    // After delete, the key reads as absent and has() is false.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        prop_assert!(!store.has(&key));
        store.set(&key, value, None);
        prop_assert!(store.has(&key));

        store.delete(&key);

        prop_assert!(!store.has(&key));
        prop_assert_eq!(store.get(&key), None);
        // Deleting again is a no-op
        store.delete(&key);
        prop_assert!(store.is_empty());
    }

    // **Property 4: Capacity enforcement**
    // The number of entries never exceeds max_size after a set returns.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200),
        max_size in 1usize..60
    ) {
        let mut store = CacheStore::new(max_size, TEST_DEFAULT_TTL);

        for (key, value) in entries {
            store.set(&key, value, None);
            prop_assert!(
                store.len() <= max_size,
                "Cache size {} exceeds max {}",
                store.len(),
                max_size
            );
        }
    }

    // **Property 5: LRU eviction order**
    // Filling the cache and inserting one more key evicts the oldest key only.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(key_strategy(), 3..10),
        new_key in key_strategy(),
    ) {
        let unique_keys = unique_in_order(initial_keys);
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = CacheStore::new(capacity, TEST_DEFAULT_TTL);

        for key in &unique_keys {
            store.set(key, format!("value_{}", key), None);
        }
        prop_assert_eq!(store.len(), capacity);

        store.set(&new_key, "new".to_string(), None);

        prop_assert_eq!(store.len(), capacity, "Cache should remain at capacity after eviction");
        prop_assert!(!store.has(&unique_keys[0]), "Oldest key should have been evicted");
        prop_assert!(store.has(&new_key), "New key should exist after insertion");
        for key in unique_keys.iter().skip(1) {
            prop_assert!(store.has(key), "Key '{}' should still exist", key);
        }
    }

    // **Property 6: LRU access tracking**
    // A get on the oldest key protects it; the next oldest is evicted instead.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(key_strategy(), 3..8),
        new_key in key_strategy(),
    ) {
        let unique_keys = unique_in_order(keys);
        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let mut store = CacheStore::new(unique_keys.len(), TEST_DEFAULT_TTL);
        for key in &unique_keys {
            store.set(key, 0u8, None);
        }

        let accessed_key = &unique_keys[0];
        store.get(accessed_key);
        store.set(&new_key, 1, None);

        prop_assert!(store.has(accessed_key), "Accessed key should not be evicted");
        prop_assert!(!store.has(&unique_keys[1]), "Next oldest key should be evicted");
        prop_assert!(store.has(&new_key));
    }

    // **Property 7: Batch consistency**
    // get_many answers in request order and matches single-key gets.
    #[test]
    fn prop_batch_order(
        stored in prop::collection::vec((key_strategy(), any::<u32>()), 0..20),
        requested in prop::collection::vec(key_strategy(), 0..20)
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        store.set_many(stored.iter().map(|(k, v)| CacheItem::new(k.clone(), *v)));

        let batch = store.get_many(&requested);

        prop_assert_eq!(batch.len(), requested.len());
        for (key, value) in requested.iter().zip(batch) {
            prop_assert_eq!(value, store.get(key));
        }
    }

    // **Property 8: Isolation**
    // Operations on one store are never visible in another.
    #[test]
    fn prop_instances_isolated(
        keys in prop::collection::vec(key_strategy(), 1..20)
    ) {
        let mut first = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        let mut second = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        for key in &keys {
            first.set(key, 1u8, None);
            second.set(key, 2u8, None);
        }
        first.clear();

        for key in &keys {
            prop_assert_eq!(first.get(key), None);
            prop_assert_eq!(second.get(key), Some(2));
        }
    }

    // **Property 9: Agreement with a reference LRU**
    // Any sequence of operations leaves the store in the same state as a
    // naive Vec-based LRU model.
    #[test]
    fn prop_matches_reference_model(
        ops in prop::collection::vec(cache_op_strategy(), 1..100),
        max_size in 1usize..5
    ) {
        let mut store = CacheStore::new(max_size, None);
        let mut model = ModelCache::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&key, value, None);
                    model.set(key, value, max_size);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key));
                }
                CacheOp::Has { key } => {
                    prop_assert_eq!(store.has(&key), model.has(&key));
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.delete(&key);
                }
            }
            prop_assert_eq!(store.len(), model.entries.len());
        }

        let expected: Vec<String> = model.entries.iter().map(|(k, _)| k.clone()).collect();
        prop_assert_eq!(store.keys(), expected);
    }

    // **Property 10: Key order reflects recency**
    // `keys` lists entries in order of last write, oldest first.
    #[test]
    fn prop_keys_follow_write_order(keys in prop::collection::vec(narrow_key_strategy(), 1..40)) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, None);
        let mut expected: Vec<String> = Vec::new();

        for key in keys {
            store.set(&key, 0u8, None);
            expected.retain(|k| k != &key);
            expected.push(key);
        }

        prop_assert_eq!(store.keys(), expected);
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // **Property 11: TTL expiration**
    // An entry stored with a TTL is readable before it elapses and absent after.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        store.set(&key, value.clone(), Some(Duration::from_millis(100)));
        prop_assert_eq!(store.get(&key), Some(value), "Value should match before expiration");

        sleep(Duration::from_millis(150));

        prop_assert_eq!(store.get(&key), None, "Entry should be absent after TTL expires");
        prop_assert!(!store.has(&key));
    }
}
