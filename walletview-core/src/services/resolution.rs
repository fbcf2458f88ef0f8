//! Resolution facade - gated currency and icon resolution for call sites
//!
//! The access gate runs first. When it denies, neither resolver is invoked
//! and the result carries no resolved values.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{AccessDecision, Account, CurrencyCode, DenialReason, UserProfile, Wallet};
use crate::ports::{decode_record, tables, AuthSession, Filter, LogEvent, LogSink, RemoteStore};

use super::access::AccessGate;
use super::currency::{CurrencyResolver, ProfileCurrencyResolver};
use super::icon::{IconResolver, IconResolverConfig, StoreIconResolver};

/// Resolved display values for one wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<DenialReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Resolution {
    fn allowed(currency: CurrencyCode, icon_url: Option<String>) -> Self {
        Self {
            allowed: true,
            denial: None,
            currency: Some(currency),
            icon_url,
        }
    }

    fn denied(reason: DenialReason) -> Self {
        Self {
            allowed: false,
            denial: Some(reason),
            currency: None,
            icon_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletIcon {
    pub wallet_id: Uuid,
    pub icon_url: Option<String>,
}

/// Resolved display values for all wallets of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletsResolution {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<DenialReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    /// Same order as the input wallets; empty when denied
    pub icons: Vec<WalletIcon>,
}

/// Prefer the authoritative icon once it has settled.
///
/// `authoritative` is `None` while the lookup is in flight and `Some(None)`
/// once it has settled on "no icon".
pub fn reconcile(fast: Option<String>, authoritative: Option<Option<String>>) -> Option<String> {
    match authoritative {
        Some(settled) => settled,
        None => fast,
    }
}

pub struct ResolutionFacade {
    store: Arc<dyn RemoteStore>,
    sink: Arc<dyn LogSink>,
    gate: AccessGate,
    currency: Arc<dyn CurrencyResolver>,
    icons: Arc<dyn IconResolver>,
}

impl ResolutionFacade {
    /// Facade with the store-backed resolvers
    pub fn new(
        store: Arc<dyn RemoteStore>,
        sink: Arc<dyn LogSink>,
        icon_config: IconResolverConfig,
    ) -> Self {
        let currency = Arc::new(ProfileCurrencyResolver::new(Arc::clone(&sink)));
        let icons = Arc::new(StoreIconResolver::new(
            Arc::clone(&store),
            Arc::clone(&sink),
            icon_config,
        ));
        Self::with_resolvers(store, sink, currency, icons)
    }

    /// Facade with caller-supplied resolvers
    pub fn with_resolvers(
        store: Arc<dyn RemoteStore>,
        sink: Arc<dyn LogSink>,
        currency: Arc<dyn CurrencyResolver>,
        icons: Arc<dyn IconResolver>,
    ) -> Self {
        Self {
            gate: AccessGate::new(Arc::clone(&sink)),
            store,
            sink,
            currency,
            icons,
        }
    }

    pub fn check_access(&self, account: &Account) -> AccessDecision {
        self.gate.check(account)
    }

    /// Authoritative resolution: currency and icon resolved concurrently
    pub async fn resolve(
        &self,
        account: &Account,
        profile: Option<&UserProfile>,
        wallet: &Wallet,
    ) -> Resolution {
        match self.gate.check(account) {
            AccessDecision::Denied(reason) => Resolution::denied(reason),
            AccessDecision::Allowed => self.resolve_allowed(profile, wallet).await,
        }
    }

    /// Synchronous first-paint resolution; never touches the store
    pub fn resolve_fast(
        &self,
        account: &Account,
        profile: Option<&UserProfile>,
        wallet: &Wallet,
    ) -> Resolution {
        match self.gate.check(account) {
            AccessDecision::Denied(reason) => Resolution::denied(reason),
            AccessDecision::Allowed => Resolution::allowed(
                self.currency.resolve_currency(profile),
                self.icons.resolve_icon_url_fast(wallet),
            ),
        }
    }

    /// Gate once, then resolve every wallet's icon concurrently
    pub async fn resolve_wallets(
        &self,
        account: &Account,
        profile: Option<&UserProfile>,
        wallets: &[Wallet],
    ) -> WalletsResolution {
        if let AccessDecision::Denied(reason) = self.gate.check(account) {
            return WalletsResolution {
                allowed: false,
                denial: Some(reason),
                currency: None,
                icons: Vec::new(),
            };
        }

        let currency = async { self.currency.resolve_currency(profile) };
        let icons = join_all(wallets.iter().map(|wallet| async move {
            WalletIcon {
                wallet_id: wallet.id,
                icon_url: self.icons.resolve_icon_url(wallet).await,
            }
        }));
        let (currency, icons) = futures::join!(currency, icons);

        WalletsResolution {
            allowed: true,
            denial: None,
            currency: Some(currency),
            icons,
        }
    }

    /// Resolve for the signed-in account, loading its profile from the store.
    ///
    /// Session errors propagate. Profile lookup failures do not: the
    /// currency falls back to the default instead.
    pub async fn resolve_for_session(
        &self,
        session: &dyn AuthSession,
        wallet: &Wallet,
    ) -> Result<Resolution> {
        let account = session.current_account().await?;
        if let AccessDecision::Denied(reason) = self.gate.check(&account) {
            return Ok(Resolution::denied(reason));
        }

        let profile = self.load_profile(account.id).await;
        Ok(self.resolve_allowed(profile.as_ref(), wallet).await)
    }

    async fn resolve_allowed(&self, profile: Option<&UserProfile>, wallet: &Wallet) -> Resolution {
        let currency = async { self.currency.resolve_currency(profile) };
        let (currency, icon_url) = futures::join!(currency, self.icons.resolve_icon_url(wallet));
        Resolution::allowed(currency, icon_url)
    }

    async fn load_profile(&self, account_id: Uuid) -> Option<UserProfile> {
        let filter = Filter::new().eq("account_id", account_id.to_string());
        let result = match self.store.find_one(tables::PROFILES, &filter).await {
            Ok(Some(record)) => decode_record::<UserProfile>(record).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            self.sink.record(
                LogEvent::warn("profile_lookup_failed")
                    .with_account(account_id)
                    .with_error(e.to_string()),
            );
            None
        })
    }
}
