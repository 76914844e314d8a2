//! Cache Store Module
//!
//! Main cache engine: HashMap storage with whole-entry TTL expiry.
//! `CacheStore` is not synchronized on its own; `ProfileCache` puts it
//! behind a reader/writer lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::models::Profile;

// == Cache Store ==
/// Profile storage with a single TTL applied to every entry.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Lifetime of an entry after its last set or update
    ttl: Duration,
    /// Reads are served under a shared lock, so these are atomic
    hits: AtomicU64,
    misses: AtomicU64,
    /// Entries dropped because they expired
    evictions: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: 0,
        }
    }

    /// Returns the TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Set ==
    /// Inserts or fully replaces the entry for `key`, restarting its TTL.
    pub fn set(&mut self, key: String, profile: Profile) {
        let now = Instant::now();
        debug!(key = %key, orders = profile.orders.len(), "cache set");
        self.entries
            .insert(key, CacheEntry::new(Arc::new(profile), now));
    }

    // == Get ==
    /// Retrieves the profile for `key` if it exists and has not expired.
    ///
    /// Expired entries are reported as misses but left in place for the
    /// sweeper, so this only needs shared access.
    pub fn get(&self, key: &str) -> Option<Arc<Profile>> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&entry.value))
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    // == Update ==
    /// Applies `mutate` to a copy of the live profile for `key` and stores
    /// the result, restarting the TTL.
    ///
    /// Orders changed by `mutate` (or added by it) get `updated_at` stamped;
    /// orders that kept their id keep their `created_at`. Absent keys are
    /// left absent. An expired entry counts as absent and is dropped.
    ///
    /// Returns true if an entry was updated.
    pub fn update_with<F>(&mut self, key: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut Profile),
    {
        let now = Instant::now();
        let Some(entry) = self.entries.get_mut(key) else {
            debug!(key = %key, "cache update skipped: key absent");
            return false;
        };

        if entry.is_expired(self.ttl, now) {
            self.entries.remove(key);
            self.evictions += 1;
            debug!(key = %key, "cache update skipped: entry expired");
            return false;
        }

        let previous = Arc::clone(&entry.value);
        let mut next = Profile::clone(&previous);
        mutate(&mut next);
        let stamped = next.stamp_changes(&previous, Utc::now());

        entry.replace(Arc::new(next), now);
        debug!(key = %key, stamped_orders = stamped, "cache update");
        true
    }

    /// Replaces the live profile for `key` with `profile`.
    ///
    /// Same rules as [`CacheStore::update_with`].
    pub fn update(&mut self, key: &str, profile: Profile) -> bool {
        self.update_with(key, move |current| *current = profile)
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if something was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        debug!(key = %key, removed, "cache delete");
        removed
    }

    // == Cleanup Expired ==
    /// Removes every expired entry from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired(ttl, now));

        let removed = before - self.entries.len();
        self.evictions += removed as u64;
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions,
            total_entries: self.entries.len(),
        }
    }

    // == Length ==
    /// Returns the number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
