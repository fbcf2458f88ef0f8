//! User profile domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-account preferences, one profile per account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub account_id: Uuid,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Raw currency code as stored; may be empty or unsupported
    #[serde(default)]
    pub preferred_currency: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(account_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            display_name: None,
            preferred_currency: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_preferred_currency(mut self, code: impl Into<String>) -> Self {
        self.preferred_currency = Some(code.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_record_without_timestamps() {
        let account_id = Uuid::new_v4();
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "account_id": account_id,
            "preferred_currency": "EUR",
        }))
        .unwrap();
        assert_eq!(profile.account_id, account_id);
        assert_eq!(profile.preferred_currency.as_deref(), Some("EUR"));
        assert_eq!(profile.display_name, None);
    }
}
