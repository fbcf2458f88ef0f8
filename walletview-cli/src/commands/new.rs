//! New command - create records in the local store

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Input;
use rust_decimal::Decimal;
use uuid::Uuid;
use walletview_core::adapters::duckdb::DuckDbStore;
use walletview_core::{Account, AccountStatus, CurrencyCode, UserProfile, Wallet, WalletIconFile};

use super::{get_context, parse_id};

#[derive(Subcommand)]
pub enum NewCommands {
    /// Add an account
    Account {
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Status (active, suspended)
        #[arg(long, default_value = "active")]
        status: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or replace an account's profile
    Profile {
        /// Account ID
        #[arg(long)]
        account_id: Option<String>,
        /// Preferred currency code
        #[arg(long)]
        currency: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a wallet
    Wallet {
        /// Owning account ID
        #[arg(long)]
        account_id: Option<String>,
        /// Wallet name
        #[arg(long)]
        name: Option<String>,
        /// Balance amount
        #[arg(long)]
        balance: Option<String>,
        /// Icon file ID
        #[arg(long)]
        icon_file: Option<String>,
        /// Legacy icon URL
        #[arg(long)]
        icon_url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register an icon file
    Icon {
        /// Object path inside the icon bucket
        #[arg(long)]
        path: Option<String>,
        /// Icon file ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// MIME type
        #[arg(long)]
        mime_type: Option<String>,
        /// Register the file as inactive
        #[arg(long)]
        inactive: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: NewCommands) -> Result<()> {
    let ctx = get_context()?;
    let Some(store) = ctx.local_store.as_deref() else {
        bail!("Records can only be created in the local store; unset the store URL to use it");
    };

    match command {
        NewCommands::Account { email, status, json } => run_account(store, email, &status, json),
        NewCommands::Profile { account_id, currency, name, json } => {
            run_profile(store, account_id, currency, name, json)
        }
        NewCommands::Wallet { account_id, name, balance, icon_file, icon_url, json } => {
            run_wallet(store, account_id, name, balance, icon_file, icon_url, json)
        }
        NewCommands::Icon { path, id, mime_type, inactive, json } => {
            run_icon(store, path, id, mime_type, inactive, json)
        }
    }
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

fn run_account(store: &DuckDbStore, email: Option<String>, status: &str, json: bool) -> Result<()> {
    let status = match AccountStatus::from_raw(status) {
        AccountStatus::Unknown => bail!("Invalid status: {} (use active or suspended)", status),
        known => known,
    };
    let mut account = Account::new(Uuid::new_v4()).with_status(Some(status));
    if let Some(email) = email {
        account = account.with_email(email);
    }
    store.upsert_account(&account)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
    } else {
        println!("{}", "Account created".green());
        println!("  ID: {}", account.id);
        println!("  Status: {}", status.as_str());
    }
    Ok(())
}

fn run_profile(
    store: &DuckDbStore,
    account_id: Option<String>,
    currency: Option<String>,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    let account_id = parse_id(&prompt_if_missing(account_id, "Account ID")?, "account")?;

    let mut profile = UserProfile::new(account_id);
    profile.display_name = name;
    if let Some(code) = currency {
        if code.parse::<CurrencyCode>().is_err() {
            eprintln!(
                "{}",
                format!("Currency {} is not supported; {} will be shown", code, CurrencyCode::DEFAULT)
                    .yellow()
            );
        }
        profile = profile.with_preferred_currency(code);
    }
    store.upsert_profile(&profile)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("{}", "Profile saved".green());
        println!("  Account: {}", profile.account_id);
        println!(
            "  Currency: {}",
            profile.preferred_currency.as_deref().unwrap_or("(default)")
        );
    }
    Ok(())
}

fn run_wallet(
    store: &DuckDbStore,
    account_id: Option<String>,
    name: Option<String>,
    balance: Option<String>,
    icon_file: Option<String>,
    icon_url: Option<String>,
    json: bool,
) -> Result<()> {
    let account_id = parse_id(&prompt_if_missing(account_id, "Account ID")?, "account")?;
    let name = prompt_if_missing(name, "Wallet name")?;

    let mut wallet = Wallet::new(Uuid::new_v4(), account_id, name);
    if let Some(b) = balance {
        wallet.balance = b
            .trim()
            .parse::<Decimal>()
            .map_err(|_| anyhow!("Invalid balance amount"))?;
    }
    if let Some(file_id) = icon_file {
        wallet = wallet.with_icon_file(file_id);
    }
    if let Some(url) = icon_url {
        wallet = wallet.with_icon_url(url);
    }
    store.upsert_wallet(&wallet)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&wallet)?);
    } else {
        println!("{}", "Wallet created".green());
        println!("  ID: {}", wallet.id);
        println!("  Account: {}", wallet.account_id);
        println!("  Name: {}", wallet.name);
    }
    Ok(())
}

fn run_icon(
    store: &DuckDbStore,
    path: Option<String>,
    id: Option<String>,
    mime_type: Option<String>,
    inactive: bool,
    json: bool,
) -> Result<()> {
    let path = prompt_if_missing(path, "Object path")?;
    let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut file = WalletIconFile::new(id, path);
    file.mime_type = mime_type;
    if inactive {
        file = file.inactive();
    }
    store.upsert_icon_file(&file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        println!("{}", "Icon file registered".green());
        println!("  ID: {}", file.id);
        println!("  Path: {}", file.file_path);
        println!("  Active: {}", file.is_active);
    }
    Ok(())
}
