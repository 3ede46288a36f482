//! Eviction Policy Module
//!
//! Maps a configured policy to the key that should be evicted next.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::KeyHistory;
use crate::error::CacheError;

// == Eviction Policy ==
/// Rule used to choose a victim when the cache exceeds its bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicy {
    /// Evict the key whose last lookup is oldest
    #[default]
    LeastRecentlyUsed,
    /// Evict the key with the fewest lookups
    LeastFrequentlyUsed,
}

impl EvictionPolicy {
    // == Select Victim ==
    /// Names the key to evict, or None if the history tracks nothing.
    pub fn select_victim<K>(&self, history: &KeyHistory<K>) -> Option<K>
    where
        K: Eq + Hash + Clone,
    {
        match self {
            EvictionPolicy::LeastRecentlyUsed => history.find_lru_key(),
            EvictionPolicy::LeastFrequentlyUsed => history.find_lfu_key(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::LeastRecentlyUsed => "least-recently-used",
            EvictionPolicy::LeastFrequentlyUsed => "least-frequently-used",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "least-recently-used" | "lru" => Ok(EvictionPolicy::LeastRecentlyUsed),
            "least-frequently-used" | "lfu" => Ok(EvictionPolicy::LeastFrequentlyUsed),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}
