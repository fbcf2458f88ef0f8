//! Access command - run the access gate for an account

use anyhow::Result;
use colored::Colorize;

use super::{ensure_allowed, get_context, load_account, parse_id};
use crate::output;

pub async fn run(account_id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let account = load_account(&ctx, parse_id(account_id, "account")?).await?;
    let decision = ctx.facade.check_access(&account);

    if json && decision.is_allowed() {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }
    ensure_allowed(decision, json)?;

    output::success("Access allowed");
    println!(
        "  Account: {}",
        account.email.as_deref().unwrap_or(&account.id.to_string())
    );
    println!(
        "  Status: {}",
        account.status.map(|s| s.as_str()).unwrap_or("unknown").bold()
    );
    Ok(())
}
