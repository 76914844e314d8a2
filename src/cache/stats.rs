//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses and expiry evictions.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of reads that found a live entry
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries removed because their TTL elapsed
    pub evictions: u64,
    /// Entries physically held, including expired ones not yet swept
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
