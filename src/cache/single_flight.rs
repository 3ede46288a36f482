//! Single-Flight Loader Module
//!
//! Coalesces concurrent misses on the same key into one producer call.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{trace, warn};

use crate::cache::SharedCache;

/// In-flight computation shared by every caller waiting on one key.
type Pending<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

type PendingMap<K, V, E> = Mutex<HashMap<K, Pending<V, E>>>;

// == Single Flight ==
/// Compute-on-miss front end that runs at most one producer per key at a time.
///
/// Callers that miss a key while its value is already being computed wait for
/// that computation and receive the same `Ok` or `Err`. Successful values are
/// stored through the cache's regular computed-insert path, so the size bound
/// and eviction policy apply as usual. Failures are never cached: the next
/// miss after a failure runs a fresh producer. A producer that panics
/// releases its key as well; the callers waiting on it see the panic.
///
/// A computation is driven by whoever awaits it. If every waiter is dropped
/// (a timeout, an aborted task) the computation stays registered, unpolled,
/// and the next caller for that key joins and resumes it instead of starting
/// a new producer. Registered computations only hold a weak reference to the
/// pending map, so dropping the last `SingleFlight` clone frees them.
pub struct SingleFlight<K, V, E> {
    cache: SharedCache<K, V>,
    pending: Arc<PendingMap<K, V, E>>,
}

impl<K, V, E> Clone for SingleFlight<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<K, V, E> SingleFlight<K, V, E>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(cache: SharedCache<K, V>) -> Self {
        Self {
            cache,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The cache this loader fills.
    pub fn cache(&self) -> &SharedCache<K, V> {
        &self.cache
    }

    // == Get Or Compute ==
    /// Returns the stored value, joining or starting the computation on a miss.
    ///
    /// `producer` is only invoked when no computation for `key` is pending.
    pub async fn get_or_compute<F, Fut>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let computation = {
            // Held across the lookup so a finishing computation cannot slip
            // between the miss and the pending check.
            let mut pending = self.pending.lock().await;

            if let Some(value) = self.cache.get(&key).await {
                return Ok(value);
            }

            match pending.get(&key) {
                Some(computation) => {
                    trace!("joining in-flight computation");
                    computation.clone()
                }
                None => {
                    let computation = Self::settle(
                        self.cache.clone(),
                        Arc::downgrade(&self.pending),
                        key.clone(),
                        producer(&key),
                    )
                    .boxed()
                    .shared();
                    pending.insert(key, computation.clone());
                    computation
                }
            }
        };

        computation.await
    }

    /// Stores a successful result, then releases the pending slot.
    ///
    /// The slot is released on panic too, before the panic reaches the waiters.
    async fn settle<Fut>(
        cache: SharedCache<K, V>,
        pending: Weak<PendingMap<K, V, E>>,
        key: K,
        computation: Fut,
    ) -> Result<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let result = match AssertUnwindSafe(computation).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                warn!("producer panicked, releasing in-flight slot");
                Self::release(&pending, &key).await;
                panic::resume_unwind(payload);
            }
        };

        match &result {
            Ok(value) => cache.insert_computed(key.clone(), value.clone()).await,
            Err(_) => cache.record_load_failure().await,
        }
        Self::release(&pending, &key).await;

        result
    }

    async fn release(pending: &Weak<PendingMap<K, V, E>>, key: &K) {
        if let Some(pending) = pending.upgrade() {
            pending.lock().await.remove(key);
        }
    }

    /// Number of keys with a computation in progress.
    pub async fn in_flight(&self) -> usize {
        self.pending.lock().await.len()
    }
}
