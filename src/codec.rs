//! JSON Codec
//!
//! Typed facade over any cache adapter that stores `serde_json::Value`.
//! Encoding and decoding failures are logged and degrade to a miss or a
//! skipped write; they never reach the caller.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::adapter::CacheAdapter;
use crate::error::Result;

// == JSON Cache ==
/// Stores serializable values in a JSON-valued cache adapter.
pub struct JsonCache<A> {
    inner: A,
}

impl<A> JsonCache<A>
where
    A: CacheAdapter<Value>,
{
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    /// Borrows the underlying adapter for untyped operations.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    // == Get ==
    /// Reads and decodes `key`. A value of the wrong shape reads as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.inner.get(key).await?;
        match decode(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to decode cached value for {}: {}", key, e);
                None
            }
        }
    }

    // == Set ==
    /// Encodes and stores `value`. Values that fail to encode are skipped.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        match serde_json::to_value(value) {
            Ok(raw) => self.inner.set(key, raw, ttl).await,
            Err(e) => warn!("Failed to encode value for {}: {}", key, e),
        }
    }

    pub async fn delete(&self, key: &str) {
        self.inner.delete(key).await;
    }

    pub async fn has(&self, key: &str) -> bool {
        self.inner.has(key).await
    }

    // == Get Or Set ==
    /// Returns the decoded cached value, or computes, stores and returns it.
    pub async fn get_or_set<T, F, Fut>(&self, key: &str, ttl: Option<Duration>, compute: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(value) = self.get(key).await {
            return value;
        }

        let value = compute().await;
        self.set(key, &value, ttl).await;
        value
    }
}

fn decode<T: DeserializeOwned>(raw: Value) -> Result<T> {
    Ok(serde_json::from_value(raw)?)
}
