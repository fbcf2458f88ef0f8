//! Format command - render an amount the way wallets display it

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde_json::json;
use walletview_core::{format_amount, CurrencyCode};

pub fn run(amount: &str, currency: &str, json: bool) -> Result<()> {
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid amount: {}", amount))?;
    let currency: CurrencyCode = currency.parse().map_err(|e: String| anyhow!(e))?;

    let formatted = format_amount(amount, currency);
    if json {
        println!(
            "{}",
            json!({ "amount": amount, "currency": currency, "formatted": formatted })
        );
    } else {
        println!("{}", formatted);
    }
    Ok(())
}
