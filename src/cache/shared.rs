//! Shared Cache Module
//!
//! Cloneable, task-safe handle around a [`Cache`].

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{Cache, CacheStats, EvictionPolicy};
use crate::config::CacheConfig;
use crate::error::Result;

// == Shared Cache ==
/// Cache handle that can be cloned across tasks and threads.
///
/// Every operation holds the lock for its whole duration, except the async
/// compute path, which releases it while the producer runs. Concurrent misses
/// on the same key are not coalesced here; see `SingleFlight` for that.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<Cache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(cache: Cache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(Cache::from_config(config)?))
    }

    /// Records an access and returns a copy of the stored value.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().await.get(key).cloned()
    }

    pub async fn contains(&self, key: &K) -> bool {
        self.inner.lock().await.contains(key)
    }

    /// Bound-exempt upsert, see [`Cache::put`].
    pub async fn put(&self, key: K, value: V) {
        self.inner.lock().await.put(key, value);
    }

    pub async fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().await.remove(key)
    }

    /// Runs a blocking producer while holding the lock.
    pub async fn get_and_compute_if_absent<F, E>(
        &self,
        key: K,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce(&K) -> std::result::Result<V, E>,
    {
        self.inner
            .lock()
            .await
            .get_and_compute_if_absent(key, producer)
    }

    // == Get And Compute If Absent (Async) ==
    /// Returns the stored value, or awaits `producer` and stores its result.
    ///
    /// The lock is released while the producer runs. Two callers that miss
    /// the same key both run their producers, and the value resolved last is
    /// the one left in the cache.
    pub async fn get_and_compute_if_absent_async<F, Fut, E>(
        &self,
        key: K,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce(&K) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        match producer(&key).await {
            Ok(value) => {
                self.insert_computed(key, value.clone()).await;
                Ok(value)
            }
            Err(err) => {
                self.record_load_failure().await;
                Err(err)
            }
        }
    }

    pub(crate) async fn insert_computed(&self, key: K, value: V) {
        self.inner.lock().await.insert_computed(key, value);
    }

    pub(crate) async fn record_load_failure(&self) {
        self.inner.lock().await.record_load_failure();
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn size(&self) -> usize {
        self.inner.lock().await.size()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub async fn name(&self) -> String {
        self.inner.lock().await.name().to_string()
    }

    pub async fn eviction_policy(&self) -> EvictionPolicy {
        self.inner.lock().await.eviction_policy()
    }
}
