//! Sweep Tasks
//!
//! Background tasks that periodically drop expired cache entries and stale
//! rate-limit state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::rate_limit::RateLimiters;

// == Sweep Handle ==
/// Owner of a running sweep task.
///
/// The task stops on [`abort`](SweepHandle::abort) or when the handle is
/// dropped.
#[derive(Debug)]
pub struct SweepHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops the task.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Name of the sweep, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that removes expired cache entries every `interval`.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::with_clock(Duration::from_secs(300), system_clock());
/// let sweep = spawn_cache_sweep(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_cache_sweep<T>(cache: SharedCache<T>, interval: Duration) -> SweepHandle
where
    T: Clone + Send + Sync + 'static,
{
    let handle = tokio::spawn(async move {
        info!("Starting cache sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    });

    SweepHandle {
        name: "cache",
        handle,
    }
}

/// Spawns a task that forgets rate-limit state older than `stale_after`
/// every `interval`.
pub fn spawn_limiter_sweep(
    limiters: Arc<RateLimiters>,
    interval: Duration,
    stale_after: Duration,
) -> SweepHandle {
    let handle = tokio::spawn(async move {
        info!(
            "Starting rate limit sweep with interval of {:?}, stale after {:?}",
            interval, stale_after
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = limiters.cleanup_stale(stale_after).await;

            if removed > 0 {
                info!("Rate limit sweep: removed {} stale identifiers", removed);
            } else {
                debug!("Rate limit sweep: no stale identifiers found");
            }
        }
    });

    SweepHandle {
        name: "rate_limit",
        handle,
    }
}
