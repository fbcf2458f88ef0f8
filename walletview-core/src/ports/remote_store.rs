//! Remote store port - record lookup and object URL derivation

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::domain::result::{Error, Result};

/// Table names used by the resolution layer
pub mod tables {
    pub const ACCOUNTS: &str = "accounts";
    pub const PROFILES: &str = "profiles";
    pub const WALLETS: &str = "wallets";
    pub const WALLET_ICON_FILES: &str = "wallet_icon_files";
}

/// A single row, keyed by column name
pub type Record = Map<String, JsonValue>;

/// Conjunction of column equality conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, JsonValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column = value` condition
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, JsonValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Hosted relational store plus object storage.
///
/// Implementations own their own timeout policy. Transport failures must be
/// reported as [`Error::Transport`] so callers can tell them apart from bad
/// data.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the first row of `table` matching every condition in `filter`
    async fn find_one(&self, table: &str, filter: &Filter) -> Result<Option<Record>>;

    /// Public URL for an object path inside `bucket`
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Decode a store record into a domain type
pub fn decode_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    serde_json::from_value(JsonValue::Object(record))
        .map_err(|e| Error::store(format!("malformed record: {}", e)))
}
