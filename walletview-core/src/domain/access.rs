//! Access decisions for the resolution read path

use serde::Serialize;

/// Why an account was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The account is suspended
    Suspended,
    /// The snapshot had no status, or one we do not recognize
    StatusUnavailable,
}

impl DenialReason {
    /// Text for the blocking notice shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::Suspended => {
                "This account has been suspended. Contact support to restore access."
            }
            Self::StatusUnavailable => {
                "We could not verify the status of this account. Please sign in again."
            }
        }
    }
}

/// Outcome of the access gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(*reason),
        }
    }
}
