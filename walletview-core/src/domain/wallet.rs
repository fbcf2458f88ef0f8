//! Wallet and wallet icon domain models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wallet owned by an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub balance: Decimal,
    /// Reference into `wallet_icon_files`; wins over `icon_url` when resolvable
    #[serde(default)]
    pub icon_file_id: Option<String>,
    /// Legacy direct icon URL
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(id: Uuid, account_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            account_id,
            name: name.into(),
            balance: Decimal::ZERO,
            icon_file_id: None,
            icon_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_icon_file(mut self, file_id: impl Into<String>) -> Self {
        self.icon_file_id = Some(file_id.into());
        self
    }

    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    /// The icon file reference, if it is set to something non-blank
    pub fn icon_file_ref(&self) -> Option<&str> {
        non_blank(self.icon_file_id.as_deref())
    }

    /// The legacy icon URL, if it is set to something non-blank
    pub fn legacy_icon_url(&self) -> Option<&str> {
        non_blank(self.icon_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A stored icon object that wallets can share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletIconFile {
    pub id: String,
    /// Object path inside the icon bucket
    pub file_path: String,
    pub is_active: bool,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl WalletIconFile {
    pub fn new(id: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_path: file_path.into(),
            is_active: true,
            mime_type: None,
            created_at: Utc::now(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_icon_fields_are_absent() {
        let wallet = Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Cash")
            .with_icon_file("  ")
            .with_icon_url("");
        assert_eq!(wallet.icon_file_ref(), None);
        assert_eq!(wallet.legacy_icon_url(), None);
    }

    #[test]
    fn test_icon_fields_returned_verbatim() {
        let wallet = Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Cash")
            .with_icon_file("f1")
            .with_icon_url("legacy.png");
        assert_eq!(wallet.icon_file_ref(), Some("f1"));
        assert_eq!(wallet.legacy_icon_url(), Some("legacy.png"));
    }

    #[test]
    fn test_icon_file_from_record_without_optional_fields() {
        let json = serde_json::json!({
            "id": "f1",
            "file_path": "icons/f1.png",
            "is_active": true,
        });
        let file: WalletIconFile = serde_json::from_value(json).unwrap();
        assert_eq!(file.file_path, "icons/f1.png");
        assert!(file.mime_type.is_none());
        assert_eq!(file.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_wallet_from_record_without_timestamps() {
        let json = serde_json::json!({
            "id": "7f8e5f0a-3c1d-4b7e-9a57-0c6f2d1e4b10",
            "account_id": "0b9c2d3e-4f5a-4b6c-8d7e-9f0a1b2c3d4e",
            "name": "Cash",
            "icon_file_id": "f1",
        });
        let wallet: Wallet = serde_json::from_value(json).unwrap();
        assert_eq!(wallet.icon_file_ref(), Some("f1"));
        assert_eq!(wallet.balance, Decimal::ZERO);
    }
}
