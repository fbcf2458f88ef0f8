//! Access gate - account suspension check
//!
//! Fails closed: anything other than an explicit `active` status denies.

use std::sync::Arc;

use crate::domain::{AccessDecision, Account, AccountStatus, DenialReason};
use crate::ports::{LogEvent, LogSink};

/// Decide whether resolution may proceed for `account`.
///
/// Pure function of the snapshot's status; performs no I/O.
pub fn check_access(account: &Account) -> AccessDecision {
    match account.status {
        Some(AccountStatus::Active) => AccessDecision::Allowed,
        Some(AccountStatus::Suspended) => AccessDecision::Denied(DenialReason::Suspended),
        Some(AccountStatus::Unknown) | None => {
            AccessDecision::Denied(DenialReason::StatusUnavailable)
        }
    }
}

/// [`check_access`] with denials recorded on a log sink
pub struct AccessGate {
    sink: Arc<dyn LogSink>,
}

impl AccessGate {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn check(&self, account: &Account) -> AccessDecision {
        let decision = check_access(account);
        if let AccessDecision::Denied(reason) = decision {
            let status = account.status.map(|s| s.as_str()).unwrap_or("missing");
            self.sink.record(
                LogEvent::warn("access_denied")
                    .with_account(account.id)
                    .with_message(format!("{:?} (status: {})", reason, status)),
            );
        }
        decision
    }
}
