//! Icon command - effective icon URL for a wallet

use anyhow::Result;
use serde_json::json;
use walletview_core::services::{resolve_icon_url_fast, IconResolver, StoreIconResolver};

use super::{ensure_allowed, get_context, load_account, load_wallet, parse_id};
use crate::output;

pub async fn run(wallet_id: &str, fast: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let wallet = load_wallet(&ctx, parse_id(wallet_id, "wallet")?).await?;
    let owner = load_account(&ctx, wallet.account_id).await?;
    ensure_allowed(ctx.facade.check_access(&owner), json)?;

    let icon_url = if fast {
        resolve_icon_url_fast(&wallet)
    } else {
        let resolver = StoreIconResolver::new(
            ctx.store.clone(),
            ctx.sink.clone(),
            ctx.config.icon_resolver_config(),
        );
        resolver.resolve_icon_url(&wallet).await
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "wallet_id": wallet.id,
                "icon_url": icon_url,
                "fast": fast,
            }))?
        );
    } else {
        println!("{}", output::or_none(icon_url.as_deref()));
    }
    Ok(())
}
