//! Integration Tests for the public cache API
//!
//! Exercises eviction, compute-on-miss and the shared handles through the
//! crate's re-exports only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use policy_cache::{Cache, CacheConfig, CacheError, EvictionPolicy, SharedCache, SingleFlight};
use tokio::sync::Barrier;

// == Helper Functions ==

fn create_test_cache(max_size: usize, policy: EvictionPolicy) -> Cache<String, String> {
    Cache::new("integration", max_size, policy).unwrap()
}

fn key(name: &str) -> String {
    name.to_string()
}

fn compute(cache: &mut Cache<String, String>, name: &str) -> String {
    cache
        .get_and_compute_if_absent(key(name), |k| Ok::<_, String>(format!("value_{}", k)))
        .unwrap()
}

// == Eviction Tests ==

#[test]
fn test_lru_evicts_least_recently_read() {
    let mut cache = create_test_cache(2, EvictionPolicy::LeastRecentlyUsed);

    compute(&mut cache, "A");
    compute(&mut cache, "B");
    assert_eq!(cache.get(&key("A")), Some(&"value_A".to_string()));
    compute(&mut cache, "C");

    assert_eq!(cache.size(), 2);
    assert!(cache.contains(&key("A")));
    assert!(!cache.contains(&key("B")));
    assert!(cache.contains(&key("C")));
}

#[test]
fn test_lfu_evicts_least_frequently_read() {
    let mut cache = create_test_cache(2, EvictionPolicy::LeastFrequentlyUsed);

    compute(&mut cache, "A");
    compute(&mut cache, "B");
    for _ in 0..3 {
        cache.get(&key("A"));
    }
    compute(&mut cache, "C");

    assert_eq!(cache.size(), 2);
    assert!(cache.contains(&key("A")));
    assert!(!cache.contains(&key("B")));
    assert!(cache.contains(&key("C")));
}

#[test]
fn test_bound_holds_over_long_compute_sequence() {
    let mut cache = create_test_cache(5, EvictionPolicy::LeastRecentlyUsed);

    for i in 0..100 {
        compute(&mut cache, &format!("key{}", i % 17));
        assert!(cache.size() <= 5);
    }
}

// == Compute-On-Miss Tests ==

#[test]
fn test_get_absent_key_returns_none() {
    let mut cache = create_test_cache(2, EvictionPolicy::LeastRecentlyUsed);
    compute(&mut cache, "A");

    assert_eq!(cache.get(&key("missing")), None);
    assert_eq!(cache.size(), 1);
}

#[test]
fn test_producer_runs_once_per_key() {
    let mut cache = create_test_cache(4, EvictionPolicy::LeastRecentlyUsed);
    let mut calls = 0;

    for _ in 0..2 {
        let value = cache
            .get_and_compute_if_absent(key("A"), |_| {
                calls += 1;
                Ok::<_, String>("computed".to_string())
            })
            .unwrap();
        assert_eq!(value, "computed");
    }

    assert_eq!(calls, 1);
}

#[test]
fn test_failing_producer_stores_nothing() {
    let mut cache = create_test_cache(4, EvictionPolicy::LeastRecentlyUsed);

    let result = cache.get_and_compute_if_absent(key("A"), |k| Err(format!("cannot load {}", k)));

    assert_eq!(result, Err("cannot load A".to_string()));
    assert!(!cache.contains(&key("A")));
}

#[test]
fn test_clear_empties_cache() {
    let mut cache = create_test_cache(4, EvictionPolicy::LeastFrequentlyUsed);
    compute(&mut cache, "A");
    compute(&mut cache, "B");

    cache.clear();

    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get(&key("A")), None);
}

#[test]
fn test_put_is_exempt_from_bound() {
    let mut cache = create_test_cache(2, EvictionPolicy::LeastRecentlyUsed);

    for i in 0..5 {
        cache.put(format!("bulk{}", i), "v".to_string());
    }

    assert_eq!(cache.size(), 5);
}

// == Configuration Tests ==

#[test]
fn test_from_config() {
    let config = CacheConfig {
        name: "configured".to_string(),
        max_size: 3,
        eviction_policy: EvictionPolicy::LeastFrequentlyUsed,
    };

    let cache: Cache<String, String> = Cache::from_config(&config).unwrap();

    assert_eq!(cache.name(), "configured");
    assert_eq!(cache.max_size(), 3);
    assert_eq!(cache.eviction_policy(), EvictionPolicy::LeastFrequentlyUsed);
}

#[test]
fn test_zero_size_rejected() {
    let config = CacheConfig {
        max_size: 0,
        ..CacheConfig::default()
    };

    let result = SharedCache::<String, String>::from_config(&config);
    assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
}

// == Async Tests ==

#[tokio::test]
async fn test_async_compute_on_owned_cache() {
    let mut cache = create_test_cache(2, EvictionPolicy::LeastRecentlyUsed);

    let value = cache
        .get_and_compute_if_absent_async(key("A"), |k| {
            let value = format!("async_{}", k);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok::<_, String>(value)
            }
        })
        .await
        .unwrap();

    assert_eq!(value, "async_A");
    assert_eq!(cache.get(&key("A")), Some(&"async_A".to_string()));
}

// Baseline for the uncoalesced path: both callers run their producer.
#[tokio::test]
async fn test_shared_cache_does_not_coalesce_misses() {
    let cache: SharedCache<String, String> =
        SharedCache::new(create_test_cache(4, EvictionPolicy::LeastRecentlyUsed));
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(2));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let cache = cache.clone();
        let calls = Arc::clone(&calls);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            cache
                .get_and_compute_if_absent_async(key("A"), move |_| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    barrier.wait().await;
                    Ok::<_, String>("loaded".to_string())
                })
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok("loaded".to_string()));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.size().await, 1);
}

#[tokio::test]
async fn test_single_flight_coalesces_misses() {
    let cache: SharedCache<String, String> =
        SharedCache::new(create_test_cache(4, EvictionPolicy::LeastRecentlyUsed));
    let loader: SingleFlight<String, String, String> = SingleFlight::new(cache.clone());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let loader = loader.clone();
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            loader
                .get_or_compute(key("A"), move |_| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok::<_, String>("loaded".to_string())
                })
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok("loaded".to_string()));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get(&key("A")).await, Some("loaded".to_string()));
    assert_eq!(loader.in_flight().await, 0);
}
