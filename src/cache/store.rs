//! Cache Store Module
//!
//! Main cache engine combining an `LruCache` with TTL expiration and
//! size-capped LRU eviction.

use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use crate::cache::{CacheEntry, CacheItem, CacheStats};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache Store ==
/// Bounded cache storage with LRU eviction and TTL support.
///
/// Logical keys are namespaced with `prefix` before they reach the map and
/// stripped again by [`CacheStore::keys`].
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Entries in recency order; unbounded, eviction is done by `set`
    entries: LruCache<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL applied to entries set without an explicit one
    default_ttl: Option<Duration>,
    /// Namespace prepended to logical keys
    prefix: String,
    /// Emit per-operation debug traces
    debug: bool,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A `max_size` of zero is raised to one; use [`CacheStore::from_config`]
    /// to have it rejected instead.
    pub fn new(max_size: usize, default_ttl: Option<Duration>) -> Self {
        Self {
            entries: LruCache::unbounded(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            default_ttl,
            prefix: String::new(),
            debug: false,
        }
    }

    /// Creates a CacheStore from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.max_size, config.default_ttl())
            .with_prefix(config.prefix.clone())
            .with_debug(config.debug))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Set ==
    /// Stores a value with an optional TTL.
    ///
    /// The TTL falls back to the default TTL; with neither, the entry never
    /// expires. Overwriting resets the entry's timestamps. The key always
    /// becomes the most recently used, after which the least recently used
    /// entries are evicted until the cache is back within `max_size`.
    pub fn set(&mut self, key: &str, value: V, ttl: Option<Duration>) {
        let full_key = self.namespaced(key);
        let entry = CacheEntry::new(value, ttl.or(self.default_ttl), Instant::now());
        self.entries.put(full_key, entry);

        if self.debug {
            debug!("Cache set: {}{}", self.prefix, key);
        }

        while self.entries.len() > self.max_size {
            match self.entries.pop_lru() {
                Some((evicted_key, _)) => {
                    self.stats.record_eviction();
                    if self.debug {
                        debug!("Cache evicted: {}", evicted_key);
                    }
                }
                None => break,
            }
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key, promoting it to most recently used.
    ///
    /// Expired entries are removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let full_key = self.namespaced(key);
        if !self.check_live(&full_key) {
            self.stats.record_miss();
            if self.debug {
                debug!("Cache miss: {}", full_key);
            }
            return None;
        }

        let value = self.entries.get(&full_key).map(|entry| entry.value.clone());
        self.stats.record_hit();
        if self.debug {
            debug!("Cache hit: {}", full_key);
        }
        value
    }

    // == Has ==
    /// Checks whether a live entry exists, without touching its recency.
    ///
    /// Shares the lazy expiry of [`CacheStore::get`], so the two always agree.
    pub fn has(&mut self, key: &str) -> bool {
        let full_key = self.namespaced(key);
        self.check_live(&full_key)
    }

    /// Returns true if `full_key` holds a live entry. An expired entry is
    /// removed and counted before returning false.
    fn check_live(&mut self, full_key: &str) -> bool {
        let expired = match self.entries.peek(full_key) {
            Some(entry) => entry.is_expired_at(Instant::now()),
            None => return false,
        };

        if expired {
            self.entries.pop(full_key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            if self.debug {
                debug!("Cache expired: {}", full_key);
            }
        }
        !expired
    }

    // == Delete ==
    /// Removes an entry by key. Deleting a missing key is a no-op.
    pub fn delete(&mut self, key: &str) {
        let full_key = self.namespaced(key);
        if self.entries.pop(&full_key).is_some() {
            self.stats.set_total_entries(self.entries.len());
            if self.debug {
                debug!("Cache delete: {}", full_key);
            }
        }
    }

    // == Clear ==
    /// Removes every entry. Configuration is left untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
        if self.debug {
            debug!("Cache cleared");
        }
    }

    // == Keys ==
    /// Returns the logical keys of all live entries, prefix stripped.
    ///
    /// Callers must not rely on the order.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .rev()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .filter_map(|(key, _)| key.strip_prefix(self.prefix.as_str()))
            .map(str::to_string)
            .collect()
    }

    // == Batched Operations ==
    /// Gets each key independently; results follow the request order.
    pub fn get_many<K: AsRef<str>>(&mut self, keys: &[K]) -> Vec<Option<V>>
    where
        V: Clone,
    {
        keys.iter().map(|key| self.get(key.as_ref())).collect()
    }

    /// Sets each item independently, honoring per-item TTLs.
    pub fn set_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = CacheItem<V>>,
    {
        for item in items {
            self.set(&item.key, item.value, item.ttl);
        }
    }

    /// Deletes each key independently.
    pub fn delete_many<K: AsRef<str>>(&mut self, keys: &[K]) {
        for key in keys {
            self.delete(key.as_ref());
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.to_string())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.pop(&key);
        }

        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Time To Live ==
    /// Remaining lifetime of a key; None if it is absent, expired or has no TTL.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entry = self.entries.peek(&self.namespaced(key))?;
        if entry.is_expired_at(now) {
            return None;
        }
        entry.ttl_remaining_at(now)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
