//! Integration Tests for the Profile Cache
//!
//! Exercises the public API end to end: TTL visibility, update semantics,
//! background sweeping and concurrent access.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use profile_cache::{Order, Profile, ProfileCache};
use serde_json::json;
use tokio::time::{advance, sleep};

const TTL: Duration = Duration::from_secs(2);

// == Helper Functions ==

fn john_doe() -> Profile {
    Profile::new("u1", "John Doe").with_order(Order::new("o1", 100))
}

/// Every field of version `n` carries `n`, so a torn read is detectable.
fn versioned(n: u64) -> Profile {
    let mut profile = Profile::new("u1", format!("v{n}"));
    for i in 0..8 {
        profile.orders.push(Order::new(format!("o{i}"), n));
    }
    profile
}

// == Expiry ==

#[tokio::test(start_paused = true)]
async fn test_profile_visible_then_expired() {
    let cache = ProfileCache::new(TTL);
    cache.set("u1", john_doe());

    advance(Duration::from_millis(500)).await;
    let profile = cache.get("u1").expect("profile should be live at +0.5s");
    assert_eq!(profile.name, "John Doe");
    assert_eq!(profile.orders[0].id, "o1");
    assert_eq!(profile.orders[0].value, json!(100));

    advance(Duration::from_millis(2500)).await;
    assert!(cache.get("u1").is_none(), "profile should be gone at +3s");

    cache.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_lazy_expiry_is_exact() {
    let cache = ProfileCache::new(TTL);
    cache.close();
    cache.set("u1", john_doe());

    advance(TTL - Duration::from_millis(1)).await;
    assert!(cache.get("u1").is_some());

    advance(Duration::from_millis(2)).await;
    assert!(cache.get("u1").is_none());
    assert_eq!(cache.len(), 1, "expired entry is masked even though never swept");

    cache.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_set_resets_ttl() {
    let cache = ProfileCache::new(TTL);
    cache.set("u1", john_doe());

    advance(Duration::from_millis(1500)).await;
    cache.set("u1", john_doe());

    advance(Duration::from_millis(1500)).await;
    assert!(cache.get("u1").is_some());

    cache.shutdown().await.unwrap();
}

// == Update ==

#[tokio::test(start_paused = true)]
async fn test_update_slides_ttl_window() {
    let cache = ProfileCache::new(TTL);
    cache.set("u1", john_doe());

    advance(TTL / 2).await;
    cache.update("u1", john_doe().with_order(Order::new("o2", 200)));

    advance(TTL * 3 / 4).await;
    let profile = cache.get("u1").expect("update should have slid the window");
    assert_eq!(profile.orders.len(), 2);

    advance(TTL / 4 + Duration::from_millis(1)).await;
    assert!(cache.get("u1").is_none());

    cache.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_update_missing_key_is_noop() {
    let cache = ProfileCache::new(TTL);

    cache.update("never-set", john_doe());
    cache.update_with("never-set", |p| p.name = "Ghost".to_string());

    assert!(cache.get("never-set").is_none());
    assert!(cache.is_empty());

    cache.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_update_after_expiry_does_not_revive() {
    let cache = ProfileCache::new(TTL);
    cache.close();
    cache.set("u1", john_doe());

    advance(TTL + Duration::from_millis(1)).await;
    cache.update("u1", john_doe());

    assert!(cache.get("u1").is_none());

    cache.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_stamps_modified_orders() {
    let cache = ProfileCache::new(TTL);
    cache.set("u1", john_doe().with_order(Order::new("o2", "keep")));
    let before = cache.get("u1").unwrap();

    cache.update_with("u1", |p| {
        p.upsert_order(Order::new("o1", 150));
    });

    let after = cache.get("u1").unwrap();
    let (old_o1, new_o1) = (before.order("o1").unwrap(), after.order("o1").unwrap());
    assert_eq!(new_o1.value, json!(150));
    assert_eq!(new_o1.created_at, old_o1.created_at);
    assert!(new_o1.updated_at >= old_o1.updated_at);
    assert_eq!(after.order("o2"), before.order("o2"));

    // the earlier snapshot is untouched
    assert_eq!(before.order("o1").unwrap().value, json!(100));

    cache.shutdown().await.unwrap();
}

// == Delete ==

#[tokio::test]
async fn test_delete_is_idempotent() {
    let cache = ProfileCache::new(TTL);

    cache.delete("u1");
    cache.set("u1", john_doe());
    cache.delete("u1");
    cache.delete("u1");

    assert!(cache.get("u1").is_none());
    assert!(cache.is_empty());

    cache.shutdown().await.unwrap();
}

// == Sweeper ==

#[tokio::test(start_paused = true)]
async fn test_sweeper_reclaims_without_reads() {
    let cache = ProfileCache::new(TTL);
    for i in 0..100 {
        cache.set(format!("user-{i}"), john_doe());
    }

    // first pass at +2s sees age == ttl and keeps everything
    sleep(Duration::from_secs(3)).await;
    assert_eq!(cache.len(), 100);

    // re-set a handful so they outlive the next pass
    for i in 0..5 {
        cache.set(format!("user-{i}"), john_doe());
    }

    sleep(Duration::from_millis(1010)).await;

    assert_eq!(cache.len(), 5);
    let stats = cache.stats();
    assert_eq!(stats.evictions, 95);
    assert_eq!(stats.hits + stats.misses, 0);

    sleep(TTL).await;
    assert!(cache.is_empty());

    cache.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_reclaiming() {
    let cache = ProfileCache::new(TTL);
    cache.shutdown().await.unwrap();

    cache.set("u1", john_doe());
    sleep(TTL * 3).await;

    assert_eq!(cache.len(), 1);
    assert!(cache.get("u1").is_none());
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_readers_never_see_torn_values() {
    let cache = Arc::new(ProfileCache::new(Duration::from_secs(60)));
    cache.set("u1", versioned(0));
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    let profile = cache.get("u1").expect("key is always live");
                    let n: u64 = profile.name[1..].parse().unwrap();
                    assert_eq!(profile.orders.len(), 8);
                    for order in &profile.orders {
                        assert_eq!(order.value, json!(n), "torn read of version {n}");
                    }
                }
            });
        }

        s.spawn(|| {
            for n in 1..=2000 {
                if n % 2 == 0 {
                    cache.set("u1", versioned(n));
                } else {
                    cache.update("u1", versioned(n));
                }
            }
            done.store(true, Ordering::Relaxed);
        });
    });

    assert_eq!(cache.get("u1").unwrap().name, "v2000");
    cache.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_writers_and_sweeper() {
    let cache = Arc::new(ProfileCache::new(Duration::from_millis(20)));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("t{t}-{}", i % 10);
                    match i % 4 {
                        0 => cache.set(key, john_doe()),
                        1 => cache.update_with(&key, |p| p.name.push('!')),
                        2 => {
                            let _ = cache.get(&key);
                        }
                        _ => cache.delete(&key),
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    sleep(Duration::from_millis(250)).await;
    assert!(cache.is_empty());
    cache.shutdown().await.unwrap();
}
