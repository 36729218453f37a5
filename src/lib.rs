//! Memcache Adapter - A bounded in-memory cache
//!
//! Provides a key-value cache with per-entry TTL expiration, LRU eviction
//! under a size cap and a periodic background sweep of expired entries,
//! exposed through an async adapter interface.

pub mod adapter;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod tasks;

pub use adapter::{CacheAdapter, MemoryCacheAdapter};
pub use cache::{CacheItem, CacheStats, CacheStore};
pub use codec::JsonCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
