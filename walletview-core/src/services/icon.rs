//! Icon resolution - effective icon URL for a wallet
//!
//! Tiers, in order:
//! 1. the active `wallet_icon_files` row referenced by `icon_file_id`
//! 2. the legacy `icon_url`
//! 3. no icon
//!
//! Tier 1 is fail-open: a missing, inactive or unreachable file is logged and
//! resolution continues with tier 2. Nothing here returns an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{Wallet, WalletIconFile};
use crate::ports::{decode_record, tables, Filter, LogEvent, LogSink, RemoteStore};

/// Bucket holding wallet icon objects
pub const DEFAULT_ICON_BUCKET: &str = "wallet-icons";

/// Initial retry delay in milliseconds (doubles each retry: 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 100;

/// Upper bound on configured lookup retries
pub const MAX_LOOKUP_RETRIES: u32 = 5;

/// Upper bound on a single backoff delay in milliseconds
const MAX_RETRY_DELAY_MS: u64 = 2_000;

/// Backoff before retry number `attempt + 1`
fn retry_delay(attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(
        INITIAL_RETRY_DELAY_MS
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY_MS),
    )
}

#[async_trait]
pub trait IconResolver: Send + Sync {
    /// Authoritative resolution; may consult the store, never fails
    async fn resolve_icon_url(&self, wallet: &Wallet) -> Option<String>;

    /// First-paint resolution; never consults the store
    fn resolve_icon_url_fast(&self, wallet: &Wallet) -> Option<String>;
}

/// The legacy icon URL, verbatim, without any store access
pub fn resolve_icon_url_fast(wallet: &Wallet) -> Option<String> {
    wallet.legacy_icon_url().map(String::from)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResolverConfig {
    pub bucket: String,
    /// Extra attempts after a transport error, capped at
    /// [`MAX_LOOKUP_RETRIES`]. Not-found is never retried.
    pub lookup_retries: u32,
}

impl Default for IconResolverConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_ICON_BUCKET.to_string(),
            lookup_retries: 0,
        }
    }
}

/// Icon resolver backed by a [`RemoteStore`]
pub struct StoreIconResolver {
    store: Arc<dyn RemoteStore>,
    sink: Arc<dyn LogSink>,
    config: IconResolverConfig,
}

impl StoreIconResolver {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        sink: Arc<dyn LogSink>,
        config: IconResolverConfig,
    ) -> Self {
        Self { store, sink, config }
    }

    /// Fetch the active icon file with the given id, retrying transport errors
    async fn lookup_icon_file(&self, file_id: &str) -> Result<Option<WalletIconFile>> {
        let filter = Filter::new().eq("id", file_id).eq("is_active", true);
        let max_retries = self.config.lookup_retries.min(MAX_LOOKUP_RETRIES);
        let mut attempt = 0;
        loop {
            match self.store.find_one(tables::WALLET_ICON_FILES, &filter).await {
                Ok(Some(record)) => {
                    let file: WalletIconFile = decode_record(record)?;
                    // The store is asked for active rows only; check anyway
                    return Ok(Some(file).filter(|f| f.is_active));
                }
                Ok(None) => return Ok(None),
                Err(e) if e.is_transient() && attempt < max_retries => {
                    let delay = retry_delay(attempt);
                    attempt += 1;
                    log::debug!(
                        "icon lookup for {} failed, retrying in {}ms (attempt {}/{}): {}",
                        file_id,
                        delay.as_millis(),
                        attempt,
                        max_retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl IconResolver for StoreIconResolver {
    async fn resolve_icon_url(&self, wallet: &Wallet) -> Option<String> {
        if let Some(file_id) = wallet.icon_file_ref() {
            match self.lookup_icon_file(file_id).await {
                Ok(Some(file)) if !file.file_path.trim().is_empty() => {
                    return Some(self.store.public_url(&self.config.bucket, &file.file_path));
                }
                Ok(_) => self.sink.record(
                    LogEvent::warn("icon_file_unavailable")
                        .with_account(wallet.account_id)
                        .with_wallet(wallet.id)
                        .with_message(format!("icon file {} missing or inactive", file_id)),
                ),
                Err(e) => self.sink.record(
                    LogEvent::warn("icon_lookup_failed")
                        .with_account(wallet.account_id)
                        .with_wallet(wallet.id)
                        .with_message(format!("icon file {}", file_id))
                        .with_error(e.to_string()),
                ),
            }
        }

        resolve_icon_url_fast(wallet)
    }

    fn resolve_icon_url_fast(&self, wallet: &Wallet) -> Option<String> {
        resolve_icon_url_fast(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles_then_caps() {
        assert_eq!(retry_delay(0), Duration::from_millis(100));
        assert_eq!(retry_delay(1), Duration::from_millis(200));
        assert_eq!(retry_delay(4), Duration::from_millis(1_600));
        assert_eq!(retry_delay(5), Duration::from_millis(MAX_RETRY_DELAY_MS));
    }

    #[test]
    fn test_retry_delay_does_not_overflow() {
        for attempt in [58, 63, 64, u32::MAX] {
            assert_eq!(retry_delay(attempt), Duration::from_millis(MAX_RETRY_DELAY_MS));
        }
    }
}
