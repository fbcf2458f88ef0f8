//! Resolve command - everything a wallet card needs to render

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use walletview_core::{format_amount, Resolution};

use super::{ensure_allowed, get_context, load_account, load_wallet, parse_id};
use crate::output;

#[derive(Serialize)]
struct ResolveOutput<'a> {
    wallet_id: String,
    name: &'a str,
    #[serde(flatten)]
    resolution: &'a Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<String>,
}

pub async fn run(wallet_id: &str, fast: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let wallet = load_wallet(&ctx, parse_id(wallet_id, "wallet")?).await?;

    let resolution = if fast {
        let owner = load_account(&ctx, wallet.account_id).await?;
        let profile = ctx.get_profile(owner.id).await?;
        ctx.facade.resolve_fast(&owner, profile.as_ref(), &wallet)
    } else {
        let session = ctx.session(wallet.account_id);
        ctx.facade.resolve_for_session(&session, &wallet).await?
    };

    if let Some(reason) = resolution.denial {
        ensure_allowed(walletview_core::AccessDecision::Denied(reason), json)?;
    }

    let balance = resolution
        .currency
        .map(|currency| format_amount(wallet.balance, currency));

    if json {
        let out = ResolveOutput {
            wallet_id: wallet.id.to_string(),
            name: &wallet.name,
            resolution: &resolution,
            balance,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", wallet.name.bold());
    let mut table = output::create_table();
    table.add_row(vec!["Wallet".to_string(), wallet.id.to_string()]);
    table.add_row(vec![
        "Currency".to_string(),
        output::or_none(resolution.currency.map(|c| c.as_str())),
    ]);
    table.add_row(vec!["Balance".to_string(), output::or_none(balance.as_deref())]);
    table.add_row(vec![
        "Icon".to_string(),
        output::or_none(resolution.icon_url.as_deref()),
    ]);
    println!("{}", table);
    Ok(())
}
