//! Policy Cache - A bounded in-memory cache
//!
//! Provides LRU and LFU eviction with compute-on-miss loading for sync and
//! async value producers.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, EvictionPolicy, SharedCache, SingleFlight};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
