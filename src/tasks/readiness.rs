//! Readiness Task
//!
//! Background task that periodically probes the cache store so a failed
//! connection is re-established without callers having to ask.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheClient;

/// Spawns a background task that calls `ready()` every `interval_secs`.
///
/// `ready()` reconnects when the failure latch is set, so this keeps a
/// flapping store usable. Transitions are logged at info/warn, steady
/// state at debug.
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheClient::connect(CacheConfig::default()).await);
/// let handle = spawn_readiness_task(cache.clone(), 5);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_readiness_task(cache: Arc<CacheClient>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache readiness task with interval of {} seconds",
            interval.as_secs()
        );

        let mut was_ready: Option<bool> = None;

        loop {
            tokio::time::sleep(interval).await;

            let ready = cache.ready().await;

            match (was_ready, ready) {
                (Some(false) | None, true) => info!("Cache store is ready"),
                (Some(true) | None, false) => warn!("Cache store is not ready"),
                _ => debug!(ready, "Cache readiness unchanged"),
            }

            was_ready = Some(ready);
        }
    })
}
