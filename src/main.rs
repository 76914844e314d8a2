//! Profile Cache demo
//!
//! Seeds a cache with a few profiles, plays through the order workflow
//! (read, add an order, refresh) and then lets the sweeper reclaim
//! everything once the TTL has passed.

use anyhow::Context;
use serde_json::json;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use profile_cache::{Config, Order, Profile, ProfileCache};

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache (starts the sweeper)
/// 4. Seed profiles and run the order workflow
/// 5. Wait for three TTL periods or a shutdown signal
/// 6. Report stats and stop the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        ttl_ms = config.ttl.as_millis() as u64,
        demo_profiles = config.demo_profiles,
        "Configuration loaded"
    );

    let cache = ProfileCache::from_config(&config);

    for i in 0..config.demo_profiles {
        let id = format!("user-{i}");
        let profile = Profile::new(id.clone(), format!("Demo User {i}"))
            .with_order(Order::new(format!("{id}-o1"), json!({ "amount": 100 + i })));
        cache.set(id, profile);
    }
    info!(entries = cache.len(), "Profiles seeded");

    if let Some(profile) = cache.get("user-0") {
        info!(profile = %serde_json::to_string(&*profile)?, "Read back user-0");
    }

    cache.update_with("user-0", |profile| {
        profile.upsert_order(Order::new("user-0-o2", json!({ "amount": 250 })));
    });
    if let Some(profile) = cache.get("user-0") {
        info!(orders = profile.orders.len(), "Added an order to user-0");
    }

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = tokio::time::sleep(config.ttl * 3) => {
            info!("Three TTL periods elapsed");
        }
    }

    let stats = cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        remaining = stats.total_entries,
        hit_rate = stats.hit_rate(),
        "Cache stats"
    );

    cache.shutdown().await.context("sweeper did not stop cleanly")?;
    info!("Demo complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed, that source is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
