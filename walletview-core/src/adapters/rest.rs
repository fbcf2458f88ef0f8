//! Hosted store client
//!
//! Talks to a PostgREST-style REST endpoint:
//! `GET {base}/rest/v1/{table}?select=*&{column}=eq.{value}&limit=1`
//! and derives public object URLs under `{base}/storage/v1/object/public/`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::{Filter, Record, RemoteStore};

use super::duckdb::public_object_url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// REST client for the hosted store
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl RestStore {
    /// Create a client for `base_url`, e.g. `https://project.example.com`
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid store URL {:?}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "store URL must be http or https, got {}",
                base_url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            access_token: None,
        })
    }

    /// Send requests as the signed-in user instead of with the bare API key
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn table_url(&self, table: &str, filter: &Filter) -> Result<Url> {
        if !is_identifier(table) {
            return Err(Error::validation(format!("invalid table name: {:?}", table)));
        }
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base(), table))
            .map_err(|e| Error::Config(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            for (column, value) in filter.conditions() {
                if !is_identifier(column) {
                    return Err(Error::validation(format!("invalid column name: {:?}", column)));
                }
                query.append_pair(column, &filter_operand(value));
            }
            query.append_pair("limit", "1");
        }
        Ok(url)
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// PostgREST operand for an equality condition
fn filter_operand(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "is.null".to_string(),
        JsonValue::String(s) => format!("eq.{}", s),
        other => format!("eq.{}", other),
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn find_one(&self, table: &str, filter: &Filter) -> Result<Option<Record>> {
        let url = self.table_url(table, filter)?;

        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }
        if let Some(token) = self.access_token.as_ref().or(self.api_key.as_ref()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::transport(format!("{} returned {}", table, status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!("{} returned {}: {}", table, status, body)));
        }

        let rows: Vec<Record> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(self.base(), bucket, path)
    }
}
