//! Error types for the cache adapter
//!
//! Provides unified error handling using thiserror. Cache misses are not
//! errors: they are reported as `None` by every read operation.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache adapter.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No Tokio runtime to host the background sweep
    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// Value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache adapter.
pub type Result<T> = std::result::Result<T, CacheError>;
