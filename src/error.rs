//! Error types for the profile cache
//!
//! Cache operations never fail; these errors cover configuration loading
//! and sweeper lifecycle.

use thiserror::Error;
use tokio::runtime::TryCurrentError;
use tokio::task::JoinError;

// == Cache Error Enum ==
/// Unified error type for the profile cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// An environment variable could not be turned into a config value
    #[error("Invalid configuration: {name}={value:?} ({reason})")]
    InvalidConfig {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// No Tokio runtime was available to run the sweeper on
    #[error("No Tokio runtime for the sweeper: {0}")]
    NoRuntime(#[from] TryCurrentError),

    /// The background sweeper terminated abnormally
    #[error("Sweeper task failed: {0}")]
    Sweeper(#[from] JoinError),
}

// == Result Type Alias ==
/// Convenience Result type for the profile cache.
pub type Result<T> = std::result::Result<T, CacheError>;
