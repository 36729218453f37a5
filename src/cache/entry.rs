//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Monotonic timestamp of the insert or last overwrite
    pub created_at: Instant,
    /// Absolute expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL, stamped at `now`.
    ///
    /// A zero TTL produces an entry that is already expired. A TTL too large
    /// to be represented as an `Instant` never expires.
    pub fn new(value: V, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    // == Is Expired At ==
    /// Checks whether the entry is expired at the given instant.
    ///
    /// An entry is live only while `now < expires_at`, so it is expired from
    /// the exact moment its TTL has fully elapsed. Both the read path and the
    /// background sweep go through this predicate.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks if the entry has expired as of now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl_remaining_at(Instant::now())
    }

    /// Remaining lifetime as seen at `now`.
    pub fn ttl_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(now))
    }
}

// == Cache Item ==
/// A key/value pair submitted to a batched `set_many`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem<V> {
    pub key: String,
    pub value: V,
    /// Per-item TTL override; falls back to the cache default
    pub ttl: Option<Duration>,
}

impl<V> CacheItem<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}
