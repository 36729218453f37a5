//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task sleeps for `interval` between sweeps and takes the store's write
/// lock only for the duration of one sweep. It holds a weak reference, so it
/// stops on its own once the store has been dropped; aborting the returned
/// handle stops it immediately.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::<String>::new(1000, None)));
/// let cleanup_handle = spawn_cleanup_task(Arc::downgrade(&cache), Duration::from_secs(60));
/// // Later, on teardown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(
    cache: Weak<RwLock<CacheStore<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = cache.upgrade() else {
                debug!("Cache dropped, stopping TTL cleanup task");
                break;
            };

            let removed = {
                let mut cache_guard = store.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
