//! Retry policy for icon lookups
//!
//! Time is paused, so backoff sleeps complete instantly while
//! `tokio::time::Instant` still observes them.
//!
//! Run with: cargo test --test icon_retry_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use walletview_core::adapters::sinks::MemorySink;
use walletview_core::domain::{Wallet, WalletIconFile};
use walletview_core::ports::tables;
use walletview_core::services::{
    IconResolver, IconResolverConfig, StoreIconResolver, MAX_LOOKUP_RETRIES,
};

use common::{FakeStore, Failure, PUBLIC_BASE};

fn resolver(store: &Arc<FakeStore>, sink: &Arc<MemorySink>, retries: u32) -> StoreIconResolver {
    StoreIconResolver::new(
        store.clone(),
        sink.clone(),
        IconResolverConfig {
            lookup_retries: retries,
            ..IconResolverConfig::default()
        },
    )
}

fn wallet() -> Wallet {
    Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Savings")
        .with_icon_file("f1")
        .with_icon_url("legacy.png")
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_are_retried_until_success() {
    let store = Arc::new(FakeStore::new());
    store.insert(tables::WALLET_ICON_FILES, &WalletIconFile::new("f1", "icons/f1.png"));
    store.fail_with(Failure::Transient(2));
    let sink = Arc::new(MemorySink::new());

    let started = Instant::now();
    let url = resolver(&store, &sink, 3).resolve_icon_url(&wallet()).await;

    assert_eq!(url, Some(format!("{}/wallet-icons/icons/f1.png", PUBLIC_BASE)));
    assert_eq!(store.calls(), 3);
    // 100ms then 200ms of backoff
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(sink.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_fall_back_to_legacy_url() {
    let store = Arc::new(FakeStore::new());
    store.insert(tables::WALLET_ICON_FILES, &WalletIconFile::new("f1", "icons/f1.png"));
    store.fail_with(Failure::Transient(10));
    let sink = Arc::new(MemorySink::new());

    let url = resolver(&store, &sink, 2).resolve_icon_url(&wallet()).await;

    assert_eq!(url.as_deref(), Some("legacy.png"));
    assert_eq!(store.calls(), 3);
    assert_eq!(sink.named("icon_lookup_failed").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_store_errors_are_not_retried() {
    let store = Arc::new(FakeStore::new());
    store.fail_with(Failure::Always);
    let sink = Arc::new(MemorySink::new());

    let url = resolver(&store, &sink, 3).resolve_icon_url(&wallet()).await;

    assert_eq!(url.as_deref(), Some("legacy.png"));
    assert_eq!(store.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_file_is_not_retried() {
    let store = Arc::new(FakeStore::new());
    let sink = Arc::new(MemorySink::new());

    let url = resolver(&store, &sink, 3).resolve_icon_url(&wallet()).await;

    assert_eq!(url.as_deref(), Some("legacy.png"));
    assert_eq!(store.calls(), 1);
    assert_eq!(sink.named("icon_file_unavailable").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_large_retry_count_is_capped() {
    let store = Arc::new(FakeStore::new());
    store.fail_with(Failure::Transient(64));
    let sink = Arc::new(MemorySink::new());

    let started = Instant::now();
    let url = resolver(&store, &sink, 64).resolve_icon_url(&wallet()).await;

    assert_eq!(url.as_deref(), Some("legacy.png"));
    assert_eq!(store.calls(), MAX_LOOKUP_RETRIES as usize + 1);
    // 100 + 200 + 400 + 800 + 1600ms
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(sink.named("icon_lookup_failed").len(), 1);
}
