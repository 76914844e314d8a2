//! Profile Cache Handle
//!
//! Thread-safe front for [`CacheStore`]: owns the reader/writer lock and the
//! background sweeper for the lifetime of the cache.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::models::Profile;
use crate::tasks::spawn_sweeper;

// == Profile Cache ==
/// In-memory profile cache with TTL expiry and a background sweeper.
///
/// Reads take a shared lock; writes and sweeps take the exclusive lock.
/// None of the lock holds span I/O or an `.await`. Share the handle across
/// threads with `Arc<ProfileCache>`.
pub struct ProfileCache {
    store: Arc<RwLock<CacheStore>>,
    cancel: CancellationToken,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ProfileCache {
    // == Constructor ==
    /// Creates an empty cache and starts its sweeper, which runs once per `ttl`.
    ///
    /// Outside a Tokio runtime the cache is still usable, but no sweeper
    /// runs: expired entries stay hidden from reads and are only reclaimed
    /// by `delete` or a later `set`. Use [`try_new`](Self::try_new) to treat
    /// that as an error instead.
    pub fn new(ttl: Duration) -> Self {
        match Self::try_new(ttl) {
            Ok(cache) => cache,
            Err(err) => {
                warn!(error = %err, "profile cache created without a sweeper");
                Self::build(ttl, false)
            }
        }
    }

    /// Creates an empty cache and starts its sweeper, failing if there is
    /// no Tokio runtime to spawn it on.
    pub fn try_new(ttl: Duration) -> Result<Self> {
        Handle::try_current()?;
        Ok(Self::build(ttl, true))
    }

    fn build(ttl: Duration, with_sweeper: bool) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(ttl)));
        let cancel = CancellationToken::new();

        let sweeper = if with_sweeper {
            Some(spawn_sweeper(Arc::clone(&store), ttl, cancel.clone()))
        } else {
            cancel.cancel();
            None
        };

        info!(ttl_ms = ttl.as_millis() as u64, sweeper = with_sweeper, "profile cache created");

        Self {
            store,
            cancel,
            sweeper: Mutex::new(sweeper),
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ttl)
    }

    /// Returns the TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.read().ttl()
    }

    /// Inserts or replaces the profile for `key`, restarting its TTL.
    pub fn set(&self, key: impl Into<String>, profile: Profile) {
        self.write().set(key.into(), profile);
    }

    /// Returns the live profile for `key`, or `None` if it is absent or expired.
    ///
    /// The returned profile is never modified in place by the cache.
    pub fn get(&self, key: &str) -> Option<Arc<Profile>> {
        self.read().get(key)
    }

    /// Replaces the profile for an existing live `key` and restarts its TTL.
    ///
    /// Does nothing if `key` is absent or expired.
    pub fn update(&self, key: &str, profile: Profile) {
        self.write().update(key, profile);
    }

    /// Mutates the profile for an existing live `key` and restarts its TTL.
    ///
    /// `mutate` runs on a copy while the write lock is held, so keep it short.
    /// Does nothing if `key` is absent or expired.
    pub fn update_with<F>(&self, key: &str, mutate: F)
    where
        F: FnOnce(&mut Profile),
    {
        self.write().update_with(key, mutate);
    }

    /// Removes `key`. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        self.write().delete(key);
    }

    /// Number of entries held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.read().stats()
    }

    // == Lifecycle ==
    /// Signals the sweeper to stop. Cache operations keep working, but
    /// expired entries are no longer reclaimed in the background.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// True once [`close`](Self::close) or [`shutdown`](Self::shutdown) was called.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the sweeper and waits for it to exit.
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) -> Result<()> {
        self.close();

        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.await?;
            info!("profile cache shut down");
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache")
            .field("store", &self.store)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for ProfileCache {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            warn!("ProfileCache dropped without shutdown; cancelling sweeper");
            self.cancel.cancel();
        }
    }
}
