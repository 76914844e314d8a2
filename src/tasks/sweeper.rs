//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest period the sweeper will tick at.
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Longest period the sweeper will tick at. Larger TTLs (up to
/// `Duration::MAX` for "never expire") still sweep at least once a day.
pub const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Spawns a background task that periodically sweeps expired entries.
///
/// The first pass runs one `period` after spawning. Each pass takes the
/// write lock, removes every expired entry and releases the lock before
/// sleeping again. The task exits when `cancel` is triggered.
///
/// # Arguments
/// * `cache` - shared reference to the store
/// * `period` - time between passes, clamped to [`MIN_SWEEP_PERIOD`]..=[`MAX_SWEEP_PERIOD`]
/// * `cancel` - stop signal
///
/// # Panics
/// Must be called from within a Tokio runtime.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::new(ttl)));
/// let cancel = CancellationToken::new();
/// let handle = spawn_sweeper(cache.clone(), ttl, cancel.clone());
/// // Later, during shutdown:
/// cancel.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweeper(
    cache: Arc<RwLock<CacheStore>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let period = period.clamp(MIN_SWEEP_PERIOD, MAX_SWEEP_PERIOD);

    tokio::spawn(async move {
        info!(period_ms = period.as_millis() as u64, "TTL sweeper started");

        let now = Instant::now();
        let start = now.checked_add(period).unwrap_or(now);
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let removed = {
                let mut store = cache.write().unwrap_or_else(PoisonError::into_inner);
                store.cleanup_expired()
            };

            if removed > 0 {
                info!(removed, "TTL sweep: removed expired entries");
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }

        info!("TTL sweeper stopped");
    })
}
