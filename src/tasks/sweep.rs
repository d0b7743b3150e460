//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are never read again do not hold memory indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task sleeps between sweeps and holds the write lock only for the
/// duration of one sweep. It keeps a weak reference to the store and exits
/// once every other owner has dropped it, or when aborted.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::new(CacheConfig::default())?));
/// let sweeper = spawn_sweep_task(store.clone(), Duration::from_secs(60));
/// // Later, during teardown:
/// sweeper.abort();
/// ```
pub fn spawn_sweep_task<T>(cache: Arc<RwLock<CacheStore<T>>>, interval: Duration) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    let weak = Arc::downgrade(&cache);
    drop(cache);

    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting cache expiry sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let Some(cache) = weak.upgrade() else {
                debug!("Cache dropped, stopping expiry sweep task");
                break;
            };

            let (removed, remaining) = {
                let mut store = cache.write().await;
                let removed = store.sweep_expired();
                (removed, store.len())
            };

            if removed > 0 {
                info!(removed, remaining, "Expiry sweep removed expired entries");
            } else {
                debug!(remaining, "Expiry sweep found no expired entries");
            }
        }
    })
}
