//! Cache Module
//!
//! Provides the in-memory profile cache with whole-entry TTL expiry.

mod entry;
mod handle;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::ProfileCache;
pub use stats::CacheStats;
pub use store::CacheStore;
