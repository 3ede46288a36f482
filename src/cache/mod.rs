//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU/LFU eviction and
//! compute-on-miss loading for sync and async producers.

mod history;
mod policy;
mod shared;
mod single_flight;
mod stats;
mod store;


// Re-export public types
pub use history::{KeyHistory, KeyRecord};
pub use policy::EvictionPolicy;
pub use shared::SharedCache;
pub use single_flight::SingleFlight;
pub use stats::CacheStats;
pub use store::Cache;
