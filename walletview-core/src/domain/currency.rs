//! Currency codes supported for display

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the UI can display balances in.
///
/// The set is closed: codes outside it cannot be chosen as a display
/// currency and resolve to [`CurrencyCode::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
    Chf,
    Cny,
    Inr,
    Brl,
    Mxn,
    Krw,
    Sek,
    Nok,
    Dkk,
    Pln,
    Nzd,
    Sgd,
    Hkd,
    Zar,
}

impl CurrencyCode {
    pub const DEFAULT: CurrencyCode = CurrencyCode::Usd;

    pub const ALL: [CurrencyCode; 20] = [
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Jpy,
        Self::Cad,
        Self::Aud,
        Self::Chf,
        Self::Cny,
        Self::Inr,
        Self::Brl,
        Self::Mxn,
        Self::Krw,
        Self::Sek,
        Self::Nok,
        Self::Dkk,
        Self::Pln,
        Self::Nzd,
        Self::Sgd,
        Self::Hkd,
        Self::Zar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
            Self::Inr => "INR",
            Self::Brl => "BRL",
            Self::Mxn => "MXN",
            Self::Krw => "KRW",
            Self::Sek => "SEK",
            Self::Nok => "NOK",
            Self::Dkk => "DKK",
            Self::Pln => "PLN",
            Self::Nzd => "NZD",
            Self::Sgd => "SGD",
            Self::Hkd => "HKD",
            Self::Zar => "ZAR",
        }
    }

    /// Display symbol, when one is unambiguous in an English locale
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Self::Usd => Some("$"),
            Self::Eur => Some("€"),
            Self::Gbp => Some("£"),
            Self::Jpy => Some("¥"),
            Self::Inr => Some("₹"),
            Self::Krw => Some("₩"),
            Self::Brl => Some("R$"),
            Self::Cad => Some("CA$"),
            Self::Aud => Some("A$"),
            Self::Mxn => Some("MX$"),
            Self::Nzd => Some("NZ$"),
            Self::Hkd => Some("HK$"),
            Self::Cny => Some("CN¥"),
            _ => None,
        }
    }

    /// Number of digits after the decimal separator
    pub fn minor_units(&self) -> u32 {
        match self {
            Self::Jpy | Self::Krw => 0,
            _ => 2,
        }
    }

    /// Normalize a raw code: trimmed, uppercase
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = Self::normalize(s);
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| format!("unsupported currency code: {:?}", s))
    }
}
