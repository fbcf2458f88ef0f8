//! Shared fakes for integration tests
//!
//! The fakes count every call so tests can assert that a code path did or
//! did not reach a collaborator.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;

use walletview_core::domain::{CurrencyCode, UserProfile, Wallet};
use walletview_core::ports::{Filter, Record, RemoteStore};
use walletview_core::services::{resolve_currency, resolve_icon_url_fast, CurrencyResolver, IconResolver};
use walletview_core::Error;

pub const PUBLIC_BASE: &str = "https://cdn.test";

/// How the fake store should fail, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    None,
    /// The next `n` calls fail with a transport error
    Transient(usize),
    /// Every call fails with a non-transient store error
    Always,
}

/// In-memory [`RemoteStore`] with call counting and failure injection
pub struct FakeStore {
    rows: Mutex<HashMap<String, Vec<Record>>>,
    failure: Mutex<Failure>,
    calls: AtomicUsize,
    public_url_calls: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            failure: Mutex::new(Failure::None),
            calls: AtomicUsize::new(0),
            public_url_calls: AtomicUsize::new(0),
        }
    }

    pub fn insert<T: Serialize>(&self, table: &str, row: &T) {
        let record = match serde_json::to_value(row).unwrap() {
            JsonValue::Object(map) => map,
            other => panic!("rows must serialize to objects, got {}", other),
        };
        self.rows
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = failure;
    }

    /// Number of `find_one` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn public_url_calls(&self) -> usize {
        self.public_url_calls.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<Error> {
        let mut failure = self.failure.lock().unwrap();
        match *failure {
            Failure::None => None,
            Failure::Always => Some(Error::store("store rejected the request")),
            Failure::Transient(n) => {
                *failure = if n > 1 { Failure::Transient(n - 1) } else { Failure::None };
                Some(Error::transport("connection reset"))
            }
        }
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn find_one(&self, table: &str, filter: &Filter) -> walletview_core::domain::result::Result<Option<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_failure() {
            return Err(err);
        }

        let rows = self.rows.lock().unwrap();
        let found = rows.get(table).and_then(|rows| {
            rows.iter()
                .find(|row| {
                    filter
                        .conditions()
                        .iter()
                        .all(|(column, value)| row.get(column).unwrap_or(&JsonValue::Null) == value)
                })
                .cloned()
        });
        Ok(found)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.public_url_calls.fetch_add(1, Ordering::SeqCst);
        format!("{}/{}/{}", PUBLIC_BASE, bucket, path)
    }
}

/// Currency resolver that counts invocations
#[derive(Default)]
pub struct CountingCurrencyResolver {
    calls: AtomicUsize,
}

impl CountingCurrencyResolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CurrencyResolver for CountingCurrencyResolver {
    fn resolve_currency(&self, profile: Option<&UserProfile>) -> CurrencyCode {
        self.calls.fetch_add(1, Ordering::SeqCst);
        resolve_currency(profile)
    }
}

/// Icon resolver that counts invocations on both paths
#[derive(Default)]
pub struct CountingIconResolver {
    calls: AtomicUsize,
    fast_calls: AtomicUsize,
}

impl CountingIconResolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fast_calls(&self) -> usize {
        self.fast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IconResolver for CountingIconResolver {
    async fn resolve_icon_url(&self, wallet: &Wallet) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        resolve_icon_url_fast(wallet)
    }

    fn resolve_icon_url_fast(&self, wallet: &Wallet) -> Option<String> {
        self.fast_calls.fetch_add(1, Ordering::SeqCst);
        resolve_icon_url_fast(wallet)
    }
}
