//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

const DEFAULT_TTL_MS: u64 = 2000;
const DEFAULT_DEMO_PROFILES: usize = 3;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time-to-live applied to every entry
    pub ttl: Duration,
    /// Number of profiles seeded by the demo binary
    pub demo_profiles: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 2000, must be > 0)
    /// - `DEMO_PROFILES` - Profiles seeded by the demo binary (default: 3)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl_ms: u64 = parse_var(&lookup, "CACHE_TTL_MS", DEFAULT_TTL_MS)?;
        if ttl_ms == 0 {
            return Err(CacheError::InvalidConfig {
                name: "CACHE_TTL_MS",
                value: ttl_ms.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            ttl: Duration::from_millis(ttl_ms),
            demo_profiles: parse_var(&lookup, "DEMO_PROFILES", DEFAULT_DEMO_PROFILES)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(DEFAULT_TTL_MS),
            demo_profiles: DEFAULT_DEMO_PROFILES,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| CacheError::InvalidConfig {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
