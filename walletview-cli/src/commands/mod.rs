//! CLI command implementations

pub mod access;
pub mod currency;
pub mod format;
pub mod icon;
pub mod logs;
pub mod new;
pub mod resolve;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use uuid::Uuid;
use walletview_core::{AccessDecision, Account, Wallet, WalletViewContext};

/// Get the data directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WALLETVIEW_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".walletview")
    }
}

/// Get or create the WalletView context
pub fn get_context() -> Result<WalletViewContext> {
    let data_dir = get_data_dir();
    WalletViewContext::new(&data_dir).context("Failed to initialize walletview context")
}

pub fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| anyhow!("Invalid {} ID: {}", what, raw))
}

pub async fn load_account(ctx: &WalletViewContext, id: Uuid) -> Result<Account> {
    ctx.get_account(id)
        .await?
        .ok_or_else(|| anyhow!("Account not found: {}", id))
}

pub async fn load_wallet(ctx: &WalletViewContext, id: Uuid) -> Result<Wallet> {
    ctx.get_wallet(id)
        .await?
        .ok_or_else(|| anyhow!("Wallet not found: {}", id))
}

/// Stop the command with the blocking notice when access is denied
///
/// With `json`, the decision is printed before failing so scripts can read it.
pub fn ensure_allowed(decision: AccessDecision, json: bool) -> Result<()> {
    match decision {
        AccessDecision::Allowed => Ok(()),
        AccessDecision::Denied(reason) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            }
            bail!("Access blocked: {}", reason.message())
        }
    }
}
