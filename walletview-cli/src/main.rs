//! WalletView CLI - Wallet access and display resolution in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

use commands::{access, currency, format, icon, logs, new, resolve};

/// WalletView - wallet access and display resolution in your terminal
#[derive(Parser)]
#[command(name = "wv", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an account may use the app
    Access {
        /// Account ID
        account_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the display currency for an account
    Currency {
        /// Account ID
        account_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the icon URL for a wallet
    Icon {
        /// Wallet ID
        wallet_id: String,
        /// Only use the legacy icon URL, without store lookups
        #[arg(long)]
        fast: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve access, currency and icon for a wallet
    Resolve {
        /// Wallet ID
        wallet_id: String,
        /// Skip store lookups for the icon
        #[arg(long)]
        fast: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Format an amount in a currency
    Format {
        /// Amount, e.g. 1234.5
        amount: String,
        /// Currency code, e.g. EUR
        currency: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create records in the local store
    New {
        #[command(subcommand)]
        command: new::NewCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

/// Route `log` records from the core to stderr.
///
/// The filter comes from `WALLETVIEW_LOG` (e.g. `walletview=debug`) and
/// defaults to warnings only so command output stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_env("WALLETVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    // Also installs the `log` bridge
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Access { account_id, json } => access::run(&account_id, json).await,
        Commands::Currency { account_id, json } => currency::run(&account_id, json).await,
        Commands::Icon { wallet_id, fast, json } => icon::run(&wallet_id, fast, json).await,
        Commands::Resolve { wallet_id, fast, json } => resolve::run(&wallet_id, fast, json).await,
        Commands::Format { amount, currency, json } => format::run(&amount, &currency, json),
        Commands::New { command } => new::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
