//! Amount formatting for display
//!
//! Always takes the currency explicitly; nothing here looks up a profile.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::CurrencyCode;

/// Format `amount` in `currency`, e.g. `-$1,234.50`, `¥1,235`, `CHF 12.00`
pub fn format_amount(amount: Decimal, currency: CurrencyCode) -> String {
    let digits = currency.minor_units();
    let rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.*}", digits as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut body = group_thousands(int_part);
    if let Some(frac) = frac_part {
        body.push('.');
        body.push_str(frac);
    }

    let sign = if negative { "-" } else { "" };
    match currency.symbol() {
        Some(symbol) => format!("{}{}{}", sign, symbol, body),
        None => format!("{}{} {}", sign, currency.as_str(), body),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_usd_with_grouping() {
        assert_eq!(format_amount(dec("1234.5"), CurrencyCode::Usd), "$1,234.50");
        assert_eq!(format_amount(dec("1234567.891"), CurrencyCode::Usd), "$1,234,567.89");
    }

    #[test]
    fn test_small_and_zero_amounts() {
        assert_eq!(format_amount(dec("0"), CurrencyCode::Eur), "€0.00");
        assert_eq!(format_amount(dec("999.999"), CurrencyCode::Eur), "€1,000.00");
        assert_eq!(format_amount(dec("12"), CurrencyCode::Gbp), "£12.00");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_amount(dec("-1234.5"), CurrencyCode::Usd), "-$1,234.50");
        // rounds to zero, so no sign
        assert_eq!(format_amount(dec("-0.001"), CurrencyCode::Usd), "$0.00");
    }

    #[test]
    fn test_zero_decimal_currencies() {
        assert_eq!(format_amount(dec("1234.5"), CurrencyCode::Jpy), "¥1,235");
        assert_eq!(format_amount(dec("-50000"), CurrencyCode::Krw), "-₩50,000");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(format_amount(dec("0.125"), CurrencyCode::Usd), "$0.13");
        assert_eq!(format_amount(dec("-0.125"), CurrencyCode::Usd), "-$0.13");
    }

    #[test]
    fn test_code_prefix_without_symbol() {
        assert_eq!(format_amount(dec("1500"), CurrencyCode::Chf), "CHF 1,500.00");
        assert_eq!(format_amount(dec("-2.5"), CurrencyCode::Sek), "-SEK 2.50");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }
}
