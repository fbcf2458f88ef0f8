//! Currency command - display currency for an account

use anyhow::Result;
use serde_json::json;
use walletview_core::services::{CurrencyResolver, ProfileCurrencyResolver};

use super::{ensure_allowed, get_context, load_account, parse_id};
use crate::output;

pub async fn run(account_id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let account = load_account(&ctx, parse_id(account_id, "account")?).await?;
    ensure_allowed(ctx.facade.check_access(&account), json)?;

    let profile = ctx.get_profile(account.id).await?;
    let resolver = ProfileCurrencyResolver::new(ctx.sink.clone());
    let currency = resolver.resolve_currency(profile.as_ref());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "account_id": account.id,
                "currency": currency,
                "preferred_currency": profile.as_ref().and_then(|p| p.preferred_currency.clone()),
            }))?
        );
        return Ok(());
    }

    println!("{}", currency);
    let preferred = profile.as_ref().and_then(|p| p.preferred_currency.as_deref());
    if let Some(raw) = preferred {
        if !raw.trim().eq_ignore_ascii_case(currency.as_str()) {
            output::warning(&format!(
                "Preferred currency {:?} is not supported, using {}",
                raw, currency
            ));
        }
    }
    Ok(())
}
