//! Cache Entry Module
//!
//! Wraps a stored profile together with the instant it was last placed
//! or refreshed in the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::models::Profile;

// == Cache Entry ==
/// A single cache entry: a shared profile plus its insertion instant.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored profile, shared with readers
    pub value: Arc<Profile>,
    /// When the entry was last set or updated (monotonic)
    pub inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped at `now`.
    pub fn new(value: Arc<Profile>, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
        }
    }

    // == Replace ==
    /// Swaps in a new profile and restarts the TTL clock.
    pub fn replace(&mut self, value: Arc<Profile>, now: Instant) {
        self.value = value;
        self.inserted_at = now;
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals `ttl` exactly is still
    /// live; it expires once its age strictly exceeds `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > ttl
    }
}
