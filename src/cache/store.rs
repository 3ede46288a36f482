//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with key history tracking and
//! policy-driven eviction on the compute-on-miss path.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::{CacheStats, EvictionPolicy, KeyHistory};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// Bounded key/value cache with LRU or LFU eviction.
///
/// The bound is enforced only when a value is computed on a miss. `put` is a
/// trusted bulk-load path: it neither checks the bound nor records history.
#[derive(Debug)]
pub struct Cache<K, V> {
    /// Key-value storage
    store: HashMap<K, V>,
    /// Access history driving victim selection
    history: KeyHistory<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Label used in log output
    name: String,
    /// Maximum number of entries kept by the compute-on-miss path
    max_size: usize,
    /// Victim selection rule, fixed for the cache lifetime
    eviction_policy: EvictionPolicy,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new cache.
    ///
    /// # Arguments
    /// * `name` - Label used in log output
    /// * `max_size` - Positive entry bound
    /// * `eviction_policy` - Victim selection rule
    ///
    /// Returns `CacheError::InvalidConfig` if `max_size` is zero.
    pub fn new(
        name: impl Into<String>,
        max_size: usize,
        eviction_policy: EvictionPolicy,
    ) -> Result<Self> {
        Self::from_config(&CacheConfig {
            name: name.into(),
            max_size,
            eviction_policy,
        })
    }

    /// Creates a new cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store: HashMap::new(),
            history: KeyHistory::new(),
            stats: CacheStats::new(),
            name: config.name.clone(),
            max_size: config.max_size,
            eviction_policy: config.eviction_policy,
        })
    }

    // == Get ==
    /// Records an access to `key` and returns its value if present.
    ///
    /// Never changes the stored entries.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.history.update(key);

        match self.store.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Contains ==
    /// Membership test. Does not count as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    // == Put ==
    /// Unconditionally stores `value` under `key`.
    ///
    /// Skips the size check and the access history, so repeated puts of
    /// distinct keys can grow the cache past `max_size`.
    pub fn put(&mut self, key: K, value: V) {
        self.store.insert(key, value);
    }

    // == Remove ==
    /// Deletes an entry and its access history.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.history.purge(key);
        self.store.remove(key)
    }

    // == Get And Compute If Absent ==
    /// Returns the stored value for `key`, computing and storing it on a miss.
    ///
    /// On a miss `producer` is called once; its value is stored, the eviction
    /// check runs, and the value is returned. A producer error is returned
    /// as-is and nothing is stored.
    pub fn get_and_compute_if_absent<F, E>(
        &mut self,
        key: K,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce(&K) -> std::result::Result<V, E>,
        V: Clone,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value.clone());
        }

        match producer(&key) {
            Ok(value) => {
                self.insert_computed(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.record_load_failure();
                Err(err)
            }
        }
    }

    // == Get And Compute If Absent (Async) ==
    /// Async counterpart of [`Cache::get_and_compute_if_absent`].
    ///
    /// The cache is borrowed mutably across the await, so one instance never
    /// runs two producers at once. Use `SharedCache` for concurrent callers.
    pub async fn get_and_compute_if_absent_async<F, Fut, E>(
        &mut self,
        key: K,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce(&K) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        V: Clone,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value.clone());
        }

        match producer(&key).await {
            Ok(value) => {
                self.insert_computed(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                self.record_load_failure();
                Err(err)
            }
        }
    }

    // == Insert Computed ==
    /// Stores a freshly computed value and runs the eviction check.
    ///
    /// A key whose history was purged while its value was being computed
    /// elsewhere gets its lookup recorded again, so every stored key that was
    /// looked up stays visible to the eviction policy.
    pub(crate) fn insert_computed(&mut self, key: K, value: V) {
        if !self.history.contains(&key) {
            self.history.update(&key);
        }
        self.store.insert(key, value);
        self.clean_up();
    }

    pub(crate) fn record_load_failure(&mut self) {
        self.stats.record_load_failure();
        debug!(cache = %self.name, "producer failed, nothing stored");
    }

    // == Clean Up ==
    /// Evicts at most one entry if the store is over its bound.
    ///
    /// History records of keys that are not stored (misses that were never
    /// filled, entries removed by `clear`) are dropped first so they can
    /// never be picked as the victim.
    fn clean_up(&mut self) {
        if self.store.len() <= self.max_size {
            return;
        }

        let store = &self.store;
        let stale = self.history.retain(|key| store.contains_key(key));
        if stale > 0 {
            trace!(cache = %self.name, stale, "dropped history of absent keys");
        }

        match self.eviction_policy.select_victim(&self.history) {
            Some(victim) => {
                self.store.remove(&victim);
                self.history.purge(&victim);
                self.stats.record_eviction();
                debug!(
                    cache = %self.name,
                    policy = %self.eviction_policy,
                    size = self.store.len(),
                    "evicted entry"
                );
            }
            None => {
                debug!(
                    cache = %self.name,
                    size = self.store.len(),
                    max_size = self.max_size,
                    "over capacity but no tracked entry to evict"
                );
            }
        }
    }

    // == Clear ==
    /// Removes every entry and resets the access history.
    pub fn clear(&mut self) {
        self.store.clear();
        self.history.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.store.len());
        stats
    }

    /// Read-only view of the access history.
    pub fn history(&self) -> &KeyHistory<K> {
        &self.history
    }

    // == Size ==
    /// Returns the current number of entries in the cache.
    pub fn size(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn eviction_policy(&self) -> EvictionPolicy {
        self.eviction_policy
    }
}
