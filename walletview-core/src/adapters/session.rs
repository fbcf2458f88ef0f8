//! Auth session adapters

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::{decode_record, tables, AuthSession, Filter, RemoteStore};

/// Session over an account snapshot the caller already holds
#[derive(Debug, Clone)]
pub struct StaticSession {
    account: Account,
}

impl StaticSession {
    pub fn new(account: Account) -> Self {
        Self { account }
    }
}

#[async_trait]
impl AuthSession for StaticSession {
    async fn current_account(&self) -> Result<Account> {
        Ok(self.account.clone())
    }
}

/// Session that reads a fresh account snapshot from the store on every call
pub struct StoreSession {
    store: Arc<dyn RemoteStore>,
    account_id: Uuid,
}

impl StoreSession {
    pub fn new(store: Arc<dyn RemoteStore>, account_id: Uuid) -> Self {
        Self { store, account_id }
    }
}

#[async_trait]
impl AuthSession for StoreSession {
    async fn current_account(&self) -> Result<Account> {
        let filter = Filter::new().eq("id", self.account_id.to_string());
        match self.store.find_one(tables::ACCOUNTS, &filter).await? {
            Some(record) => decode_record(record),
            None => Err(Error::not_found(format!("account {}", self.account_id))),
        }
    }
}
