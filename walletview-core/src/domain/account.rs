//! Account domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account standing as reported by the store.
///
/// Any status string the store returns that is not recognized lands in
/// `Unknown`, which the access gate treats the same as a missing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    #[serde(other)]
    Unknown,
}

impl AccountStatus {
    /// Parse a raw status string, case-insensitively
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Unknown => "unknown",
        }
    }
}

/// An authenticated account, read-only from this layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// `None` when the snapshot did not include a status
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new active account
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: None,
            status: Some(AccountStatus::Active),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: Option<AccountStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
