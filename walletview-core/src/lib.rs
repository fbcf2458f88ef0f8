//! WalletView Core - Access gating and display resolution for wallets
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, UserProfile, Wallet, CurrencyCode)
//! - **ports**: Trait definitions for external dependencies (RemoteStore, AuthSession, LogSink)
//! - **services**: Access gate, currency and icon resolution, formatting
//! - **adapters**: Concrete implementations (DuckDB, REST store, sinks)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use adapters::duckdb::DuckDbStore;
use adapters::rest::RestStore;
use adapters::session::StoreSession;
use adapters::sinks::{FanoutSink, LogCrateSink};
use config::Config;
use ports::{decode_record, tables, Filter, LogSink, RemoteStore};
use services::{LoggingService, ResolutionFacade};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    AccessDecision, Account, AccountStatus, CurrencyCode, DenialReason, UserProfile, Wallet,
    WalletIconFile,
};
pub use services::{format_amount, Resolution, WalletsResolution};

/// Main context for WalletView operations
///
/// Holds the configuration, the store the resolvers read from, the event
/// log and the resolution facade.
pub struct WalletViewContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<dyn RemoteStore>,
    /// Set when running against the local DuckDB store
    pub local_store: Option<Arc<DuckDbStore>>,
    pub logging: Arc<LoggingService>,
    pub sink: Arc<dyn LogSink>,
    pub facade: ResolutionFacade,
}

impl WalletViewContext {
    /// Create a new context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let config = Config::load(data_dir)?;

        let logging = Arc::new(LoggingService::new(data_dir, env!("CARGO_PKG_VERSION"))?);
        let sink: Arc<dyn LogSink> = Arc::new(FanoutSink::new(vec![
            Arc::new(LogCrateSink),
            Arc::clone(&logging) as Arc<dyn LogSink>,
        ]));

        let (store, local_store): (Arc<dyn RemoteStore>, Option<Arc<DuckDbStore>>) =
            match &config.store_url {
                Some(url) => {
                    let rest = RestStore::new(url, config.api_key.clone(), config.timeout())?;
                    (Arc::new(rest), None)
                }
                None => {
                    let local = Arc::new(DuckDbStore::open(
                        &data_dir.join("walletview.duckdb"),
                        config.public_base_url.clone(),
                    )?);
                    local.ensure_schema()?;
                    (Arc::clone(&local) as Arc<dyn RemoteStore>, Some(local))
                }
            };

        let facade = ResolutionFacade::new(
            Arc::clone(&store),
            Arc::clone(&sink),
            config.icon_resolver_config(),
        );

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            store,
            local_store,
            logging,
            sink,
            facade,
        })
    }

    /// Session that re-reads the account from the store
    pub fn session(&self, account_id: Uuid) -> StoreSession {
        StoreSession::new(Arc::clone(&self.store), account_id)
    }

    pub async fn get_account(&self, id: Uuid) -> domain::result::Result<Option<Account>> {
        self.find(tables::ACCOUNTS, Filter::new().eq("id", id.to_string()))
            .await
    }

    pub async fn get_profile(&self, account_id: Uuid) -> domain::result::Result<Option<UserProfile>> {
        self.find(
            tables::PROFILES,
            Filter::new().eq("account_id", account_id.to_string()),
        )
        .await
    }

    pub async fn get_wallet(&self, id: Uuid) -> domain::result::Result<Option<Wallet>> {
        self.find(tables::WALLETS, Filter::new().eq("id", id.to_string()))
            .await
    }

    async fn find<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        filter: Filter,
    ) -> domain::result::Result<Option<T>> {
        match self.store.find_one(table, &filter).await? {
            Some(record) => decode_record(record).map(Some),
            None => Ok(None),
        }
    }
}
