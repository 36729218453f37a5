//! Configuration Module
//!
//! Handles cache configuration, either built in code, deserialized from a
//! JSON object or loaded from environment variables.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// Every field is optional when deserializing; missing fields take the
/// defaults listed on [`CacheConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Default TTL in milliseconds for entries set without an explicit TTL.
    /// `None` or `0` means such entries never expire.
    #[serde(rename = "defaultTTL")]
    pub default_ttl_ms: Option<u64>,
    /// Namespace prepended to every logical key
    pub prefix: String,
    /// Emit per-operation debug traces
    pub debug: bool,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Background sweep interval in milliseconds
    pub cleanup_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in ms, `0` or `none` disables it (default: 300000)
    /// - `CACHE_PREFIX` - Key namespace (default: empty)
    /// - `CACHE_DEBUG` - `true`/`1` enables debug traces (default: false)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Sweep frequency in ms (default: 60000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_ttl_ms: match env::var("CACHE_DEFAULT_TTL_MS") {
                Ok(v) if v.eq_ignore_ascii_case("none") || v == "0" => None,
                Ok(v) => v.parse().ok().or(defaults.default_ttl_ms),
                Err(_) => defaults.default_ttl_ms,
            },
            prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.prefix),
            debug: env::var("CACHE_DEBUG")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.debug),
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
            cleanup_interval_ms: env::var("CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval_ms),
        }
    }

    pub fn with_default_ttl_ms(mut self, ttl_ms: Option<u64>) -> Self {
        self.default_ttl_ms = ttl_ms;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_cleanup_interval_ms(mut self, interval_ms: u64) -> Self {
        self.cleanup_interval_ms = interval_ms;
        self
    }

    /// Default TTL as a Duration, if one is configured.
    ///
    /// A default of `0` is read as "no default TTL" whatever its source, so
    /// env, builder and JSON configs agree.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }

    // == Validate ==
    /// Rejects configurations the cache cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "maxSize must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "cleanupIntervalMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: Some(300_000),
            prefix: String::new(),
            debug: false,
            max_size: 1000,
            cleanup_interval_ms: 60_000,
        }
    }
}
