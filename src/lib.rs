//! Profile Cache - An in-memory cache of user profiles and their orders
//!
//! Provides a thread-safe key-value store with per-entry TTL expiry and a
//! background sweeper that reclaims stale entries.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use cache::{CacheStats, ProfileCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use models::{Order, Profile};
pub use tasks::spawn_sweeper;
