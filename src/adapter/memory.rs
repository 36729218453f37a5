//! In-Memory Cache Adapter
//!
//! Wraps a [`CacheStore`] behind the async [`CacheAdapter`] interface and
//! owns the background sweep that reclaims expired entries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapter::CacheAdapter;
use crate::cache::{CacheItem, CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_cleanup_task;

// == Memory Cache Adapter ==
/// Bounded in-memory cache with TTL expiry, LRU eviction and a periodic
/// expiry sweep.
///
/// Each operation takes the store lock once and finishes its mutation
/// before releasing it, so operations never interleave on the entry map.
/// Instances share nothing with each other.
///
/// Call [`MemoryCacheAdapter::destroy`] to tear the cache down
/// deterministically. Dropping the adapter also stops the sweep.
pub struct MemoryCacheAdapter<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    cleanup: Mutex<Option<JoinHandle<()>>>,
}

impl<V> MemoryCacheAdapter<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an adapter and starts its expiry sweep.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let store = CacheStore::from_config(&config)?;

        Handle::try_current().map_err(|e| CacheError::RuntimeUnavailable(e.to_string()))?;

        let store = Arc::new(RwLock::new(store));
        let handle = spawn_cleanup_task(Arc::downgrade(&store), config.cleanup_interval());

        info!(
            "Memory cache initialized: max_size={}, default_ttl_ms={:?}, prefix={:?}, cleanup_interval_ms={}",
            config.max_size, config.default_ttl_ms, config.prefix, config.cleanup_interval_ms
        );

        Ok(Self {
            store,
            cleanup: Mutex::new(Some(handle)),
        })
    }

    /// Creates an adapter with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(CacheConfig::default())
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, or computes, stores and returns it.
    ///
    /// The lock is not held while `compute` runs, so concurrent callers
    /// missing on the same key may each compute; the last write wins.
    pub async fn get_or_set<F, Fut>(&self, key: &str, ttl: Option<Duration>, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cached = self.store.write().await.get(key);
        if let Some(value) = cached {
            return value;
        }

        let value = compute().await;
        self.store.write().await.set(key, value.clone(), ttl);
        value
    }

    /// Remaining lifetime of `key`; None if absent, expired or without TTL.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.store.read().await.ttl_remaining(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Runs one expiry sweep immediately, returning the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    // == Destroy ==
    /// Stops the expiry sweep and drops every entry.
    ///
    /// The sweep is aborted at most once; later calls only clear entries.
    pub async fn destroy(&self) {
        match self.cleanup.lock().await.take() {
            Some(handle) => {
                handle.abort();
                info!("Memory cache destroyed, cleanup task aborted");
            }
            None => warn!("Memory cache destroyed more than once"),
        }
        self.store.write().await.clear();
    }

    /// Returns true while the expiry sweep is still scheduled.
    pub async fn is_sweeping(&self) -> bool {
        self.cleanup
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<V> Drop for MemoryCacheAdapter<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.cleanup.get_mut().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl<V> CacheAdapter<V> for MemoryCacheAdapter<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    async fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        self.store.write().await.set(key, value, ttl);
    }

    async fn delete(&self, key: &str) {
        self.store.write().await.delete(key);
    }

    async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    async fn clear(&self) {
        self.store.write().await.clear();
    }

    async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    async fn get_many(&self, keys: &[&str]) -> Vec<Option<V>> {
        self.store.write().await.get_many(keys)
    }

    async fn set_many(&self, items: Vec<CacheItem<V>>) {
        self.store.write().await.set_many(items);
    }

    async fn delete_many(&self, keys: &[&str]) {
        self.store.write().await.delete_many(keys);
    }
}
