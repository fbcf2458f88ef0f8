//! Auth session port

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Account;

/// Supplies the account snapshot for the signed-in user
#[async_trait]
pub trait AuthSession: Send + Sync {
    async fn current_account(&self) -> Result<Account>;
}
