//! Background purge of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use cg_cache::CacheStore;

/// Call [`CacheStore::purge_expired`] every `interval` until `cancel` fires.
pub async fn run_sweeper(cache: Arc<CacheStore>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Cache sweeper started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let removed = cache.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, remaining = cache.len(), "Purged expired cache entries");
                }
            }
        }
    }

    tracing::info!("Cache sweeper stopped");
}
