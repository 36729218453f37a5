//! Cache Adapter Module
//!
//! Defines the asynchronous interface every cache backend exposes, and the
//! in-memory implementation of it.
//!
//! The interface is async so that in-memory and networked backends can be
//! used interchangeably. None of its operations report errors: a backend
//! that can fail logs the failure and degrades to a miss (for reads) or a
//! no-op (for writes), so probing a cache is always safe.

mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::CacheItem;

pub use memory::MemoryCacheAdapter;

// == Cache Adapter Trait ==
/// Uniform key-value cache interface.
///
/// The batched operations apply the single-key operation to each element
/// independently; there is no atomicity across a batch.
#[async_trait]
pub trait CacheAdapter<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Returns the live value for `key`, or None.
    async fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`. `ttl` overrides the backend's default TTL.
    async fn set(&self, key: &str, value: V, ttl: Option<Duration>);

    /// Removes `key` if present.
    async fn delete(&self, key: &str);

    /// Returns true if `key` holds a live value.
    async fn has(&self, key: &str) -> bool;

    /// Removes every entry.
    async fn clear(&self);

    /// Returns all live logical keys, in no particular order.
    async fn keys(&self) -> Vec<String>;

    async fn get_many(&self, keys: &[&str]) -> Vec<Option<V>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await);
        }
        values
    }

    async fn set_many(&self, items: Vec<CacheItem<V>>) {
        for item in items {
            self.set(&item.key, item.value, item.ttl).await;
        }
    }

    async fn delete_many(&self, keys: &[&str]) {
        for key in keys {
            self.delete(key).await;
        }
    }
}
