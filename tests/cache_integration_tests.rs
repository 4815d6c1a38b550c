//! Integration Tests for the Cache Client
//!
//! Runs against a live Redis-compatible store at CACHE_HOST:CACHE_PORT
//! (default 127.0.0.1:6379). Tests skip themselves when none is reachable.

use std::time::Duration;

use app_skeleton::{CacheClient, CacheConfig, Config};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

// == Helper Functions ==

fn live_config() -> CacheConfig {
    Config::from_env().cache
}

/// Connects to the live store, or returns None when it is not reachable.
async fn live_client() -> Option<CacheClient> {
    let client = CacheClient::connect(live_config()).await;
    if client.ready().await {
        Some(client)
    } else {
        eprintln!("Skipping test: cache store not available at {}", live_config().url());
        None
    }
}

/// Keys are namespaced per test and process so parallel runs do not collide.
fn test_key(name: &str) -> String {
    format!("app_skeleton:test:{}:{}", std::process::id(), name)
}

macro_rules! skip_if_no_store {
    () => {
        match live_client().await {
            Some(client) => client,
            None => return,
        }
    };
}

// == Basic Operations ==

#[tokio::test]
async fn test_set_get_exists_delete() {
    let cache = skip_if_no_store!();
    let key = test_key("basic");

    cache.set(&key, "v").await;
    assert_eq!(cache.get(&key).await.as_deref(), Some("v"));
    assert!(cache.key_exists(&key).await);

    cache.delete(&key).await;
    assert_eq!(cache.get(&key).await, None);
    assert!(!cache.key_exists(&key).await);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.degraded, 0);
}

#[tokio::test]
async fn test_delete_absent_key_is_noop() {
    let cache = skip_if_no_store!();
    let key = test_key("never_set");

    cache.delete(&key).await;
    assert_eq!(cache.get(&key).await, None);
    assert_eq!(cache.stats().degraded, 0);
}

#[tokio::test]
async fn test_empty_string_is_not_absent() {
    let cache = skip_if_no_store!();
    let key = test_key("empty");

    cache.set(&key, "").await;
    assert_eq!(cache.get(&key).await, Some(String::new()));
    assert!(cache.key_exists(&key).await);

    cache.delete(&key).await;
}

#[tokio::test]
async fn test_overwrite() {
    let cache = skip_if_no_store!();
    let key = test_key("overwrite");

    cache.set(&key, "first").await;
    cache.set(&key, "second").await;
    assert_eq!(cache.get(&key).await.as_deref(), Some("second"));

    cache.delete(&key).await;
}

// == Expiry ==

#[tokio::test]
async fn test_set_expire_elapses() {
    let cache = skip_if_no_store!();
    let key = test_key("expire");

    cache.set_expire(&key, "short", 1).await;
    assert_eq!(cache.get(&key).await.as_deref(), Some("short"));

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(cache.get(&key).await, None);
    assert!(!cache.key_exists(&key).await);
}

#[tokio::test]
async fn test_set_expire_default_keeps_value() {
    let cache = skip_if_no_store!();
    let key = test_key("expire_default");

    cache.set_expire_default(&key, "long").await;
    assert!(cache.key_exists(&key).await);

    cache.delete(&key).await;
}

// == Lifecycle ==

#[tokio::test]
async fn test_close_degrades_until_ready_reconnects() {
    let cache = skip_if_no_store!();
    let key = test_key("lifecycle");

    cache.set(&key, "v").await;
    cache.close().await;
    assert!(!cache.is_connected().await);

    // Closed: reads are absent, writes are dropped
    assert_eq!(cache.get(&key).await, None);
    cache.set(&key, "dropped").await;
    assert_eq!(cache.stats().degraded, 2);

    assert!(cache.ready().await);
    assert_eq!(cache.stats().reconnects, 1);
    assert_eq!(cache.get(&key).await.as_deref(), Some("v"));

    cache.delete(&key).await;
}

#[tokio::test]
async fn test_ready_is_repeatable() {
    let cache = skip_if_no_store!();

    assert!(cache.ready().await);
    assert!(cache.ready().await);
    assert!(cache.check().await.is_ok());
    assert_eq!(cache.stats().reconnects, 0);
}

// == Properties ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_roundtrip_storage(suffix in "[a-z0-9]{1,16}", value in "[a-zA-Z0-9 ]{0,64}") {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let Some(cache) = live_client().await else {
                return Ok(());
            };
            let key = test_key(&format!("prop:{}", suffix));

            cache.set(&key, &value).await;
            prop_assert_eq!(cache.get(&key).await, Some(value.clone()));

            cache.delete(&key).await;
            prop_assert_eq!(cache.get(&key).await, None);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
