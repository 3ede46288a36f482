//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Producer failures are not wrapped here: compute-on-miss operations return
//! the producer's own error type untouched.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while building or configuring a cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Construction parameters are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Eviction policy name could not be parsed
    #[error("Unknown eviction policy: {0}")]
    UnknownPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
