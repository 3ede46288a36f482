//! Policy Cache demo
//!
//! Fills a cache from a slow async producer and reports its statistics.
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Create the shared cache and a single-flight loader on top of it
//! 4. Run concurrent lookups over a skewed key set
//! 5. Print the final statistics as JSON

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policy_cache::{CacheConfig, SharedCache, SingleFlight};

const WORKERS: u64 = 4;
const LOOKUPS_PER_WORKER: u64 = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: name={}, max_size={}, eviction_policy={}",
        config.name, config.max_size, config.eviction_policy
    );

    let cache: SharedCache<u64, String> =
        SharedCache::from_config(&config).context("invalid cache configuration")?;
    let loader: SingleFlight<u64, String, String> = SingleFlight::new(cache.clone());

    let mut handles = Vec::new();
    for worker in 0..WORKERS {
        let loader = loader.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..LOOKUPS_PER_WORKER {
                // small keys come up far more often than large ones
                let key = (worker * 31 + i * i) % (1 + i % 64);
                loader.get_or_compute(key, |k| slow_lookup(*k)).await?;
            }
            Ok::<_, String>(())
        }));
    }

    for handle in handles {
        handle
            .await
            .context("worker panicked")?
            .map_err(anyhow::Error::msg)?;
    }

    let stats = cache.stats().await;
    info!(
        "Finished: hit_rate={:.2}, evictions={}",
        stats.hit_rate(),
        stats.evictions
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

/// Stand-in for an expensive backend read.
async fn slow_lookup(key: u64) -> Result<String, String> {
    tokio::time::sleep(Duration::from_millis(2)).await;
    Ok(format!("record-{}", key))
}
