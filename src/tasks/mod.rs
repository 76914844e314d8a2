//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - TTL Sweeper: removes expired cache entries once per TTL period

mod sweeper;

pub use sweeper::{spawn_sweeper, MAX_SWEEP_PERIOD, MIN_SWEEP_PERIOD};
