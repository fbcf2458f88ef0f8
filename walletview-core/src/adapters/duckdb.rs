//! DuckDB store implementation
//!
//! A local relational store with the same tables the hosted store exposes.
//! Used by the CLI when no hosted store is configured, and by tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use duckdb::{params, Connection, ToSql};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, UserProfile, Wallet, WalletIconFile};
use crate::migrations::MIGRATIONS;
use crate::ports::{decode_record, tables, Filter, Record, RemoteStore};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Bool,
    /// Read back as text so no precision is lost
    Decimal,
}

struct TableSpec {
    name: &'static str,
    columns: &'static [(&'static str, ColumnKind)],
}

/// Tables and columns that may appear in a lookup; everything else is rejected
const TABLE_SPECS: &[TableSpec] = &[
    TableSpec {
        name: tables::ACCOUNTS,
        columns: &[
            ("id", ColumnKind::Text),
            ("email", ColumnKind::Text),
            ("status", ColumnKind::Text),
            ("created_at", ColumnKind::Text),
            ("updated_at", ColumnKind::Text),
        ],
    },
    TableSpec {
        name: tables::PROFILES,
        columns: &[
            ("account_id", ColumnKind::Text),
            ("display_name", ColumnKind::Text),
            ("preferred_currency", ColumnKind::Text),
            ("created_at", ColumnKind::Text),
            ("updated_at", ColumnKind::Text),
        ],
    },
    TableSpec {
        name: tables::WALLETS,
        columns: &[
            ("id", ColumnKind::Text),
            ("account_id", ColumnKind::Text),
            ("name", ColumnKind::Text),
            ("balance", ColumnKind::Decimal),
            ("icon_file_id", ColumnKind::Text),
            ("icon_url", ColumnKind::Text),
            ("created_at", ColumnKind::Text),
            ("updated_at", ColumnKind::Text),
        ],
    },
    TableSpec {
        name: tables::WALLET_ICON_FILES,
        columns: &[
            ("id", ColumnKind::Text),
            ("file_path", ColumnKind::Text),
            ("is_active", ColumnKind::Bool),
            ("mime_type", ColumnKind::Text),
            ("created_at", ColumnKind::Text),
        ],
    },
];

fn table_spec(table: &str) -> Result<&'static TableSpec> {
    TABLE_SPECS
        .iter()
        .find(|t| t.name == table)
        .ok_or_else(|| Error::validation(format!("unknown table: {}", table)))
}

/// Build `SELECT ... FROM table WHERE ...` for a whitelisted table and filter
fn build_select(spec: &TableSpec, filter: &Filter) -> Result<(String, Vec<Box<dyn ToSql>>)> {
    let select_list: Vec<String> = spec
        .columns
        .iter()
        .map(|(name, kind)| match kind {
            ColumnKind::Decimal => format!("CAST({} AS VARCHAR)", name),
            _ => name.to_string(),
        })
        .collect();

    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();
    for (column, value) in filter.conditions() {
        if !spec.columns.iter().any(|(name, _)| name == column) {
            return Err(Error::validation(format!(
                "unknown column {} for table {}",
                column, spec.name
            )));
        }
        match value {
            JsonValue::Null => conditions.push(format!("{} IS NULL", column)),
            other => {
                conditions.push(format!("{} = ?", column));
                params.push(json_to_duckdb_param(other));
            }
        }
    }

    let mut sql = format!("SELECT {} FROM {}", select_list.join(", "), spec.name);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    Ok((sql, params))
}

fn json_to_duckdb_param(value: &JsonValue) -> Box<dyn ToSql> {
    match value {
        JsonValue::Bool(b) => Box::new(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Box::new(i)
            } else if let Some(f) = n.as_f64() {
                Box::new(f)
            } else {
                Box::new(n.to_string())
            }
        }
        JsonValue::String(s) => Box::new(s.clone()),
        other => Box::new(other.to_string()),
    }
}

fn row_to_record(spec: &TableSpec, row: &duckdb::Row) -> duckdb::Result<Record> {
    let mut record = Record::new();
    for (idx, (name, kind)) in spec.columns.iter().enumerate() {
        let value = match kind {
            ColumnKind::Bool => row
                .get::<_, Option<bool>>(idx)?
                .map(JsonValue::Bool)
                .unwrap_or(JsonValue::Null),
            ColumnKind::Text | ColumnKind::Decimal => row
                .get::<_, Option<String>>(idx)?
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        };
        record.insert(name.to_string(), value);
    }
    Ok(record)
}

/// Digits kept after the decimal point in `wallets.balance`
pub const BALANCE_SCALE: u32 = 10;

fn lock_conn(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))
}

fn select_records(
    conn: &Mutex<Connection>,
    table: &str,
    filter: &Filter,
    limit: Option<usize>,
) -> Result<Vec<Record>> {
    let spec = table_spec(table)?;
    let (mut sql, params) = build_select(spec, filter)?;
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let conn = lock_conn(conn)?;
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|b| b.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| row_to_record(spec, row))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// DuckDB-backed [`RemoteStore`]
///
/// Queries are synchronous; the async lookup runs them on tokio's blocking pool.
pub struct DuckDbStore {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
    public_base_url: String,
}

impl DuckDbStore {
    /// Open (or create) a store file.
    ///
    /// Retries with exponential backoff on file locking errors, which show
    /// up when the CLI and the app open the same file at once.
    pub fn open(db_path: &Path, public_base_url: impl Into<String>) -> Result<Self> {
        let public_base_url = public_base_url.into();
        let mut attempt = 0;
        loop {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Arc::new(Mutex::new(conn)),
                        db_path: Some(db_path.to_path_buf()),
                        public_base_url,
                    })
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        log::warn!(
                            "Store busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(Error::store(err_msg));
                }
            }
        }
    }

    /// In-memory store, schema applied
    pub fn open_in_memory(public_base_url: impl Into<String>) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
            db_path: None,
            public_base_url: public_base_url.into(),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; JSON is linked in via the cargo feature
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        lock_conn(&self.conn)
    }

    /// Run pending store migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS)
            .run_pending()
            .map_err(|e| Error::store(e.to_string()))
    }

    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Rows of `table` matching `filter`, at most `limit` when given
    pub fn find_many(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Record>> {
        select_records(&self.conn, table, filter, limit)
    }

    // === Write helpers ===

    pub fn upsert_account(&self, account: &Account) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO accounts (id, email, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at",
            params![
                account.id.to_string(),
                account.email,
                account.status.map(|s| s.as_str()),
                account.created_at.to_rfc3339(),
                account.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO profiles (account_id, display_name, preferred_currency, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (account_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                preferred_currency = EXCLUDED.preferred_currency,
                updated_at = EXCLUDED.updated_at",
            params![
                profile.account_id.to_string(),
                profile.display_name,
                profile.preferred_currency,
                profile.created_at.to_rfc3339(),
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Insert or update a wallet. Balances with more than [`BALANCE_SCALE`]
    /// fractional digits are rejected rather than rounded.
    pub fn upsert_wallet(&self, wallet: &Wallet) -> Result<()> {
        if wallet.balance.normalize().scale() > BALANCE_SCALE {
            return Err(Error::validation(format!(
                "balance {} has more than {} decimal places",
                wallet.balance, BALANCE_SCALE
            )));
        }
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO wallets (id, account_id, name, balance, icon_file_id, icon_url,
                                  created_at, updated_at)
             VALUES (?, ?, ?, CAST(? AS DECIMAL(38, 10)), ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                balance = EXCLUDED.balance,
                icon_file_id = EXCLUDED.icon_file_id,
                icon_url = EXCLUDED.icon_url,
                updated_at = EXCLUDED.updated_at",
            params![
                wallet.id.to_string(),
                wallet.account_id.to_string(),
                wallet.name,
                wallet.balance.to_string(),
                wallet.icon_file_id,
                wallet.icon_url,
                wallet.created_at.to_rfc3339(),
                wallet.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn upsert_icon_file(&self, file: &WalletIconFile) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO wallet_icon_files (id, file_path, is_active, mime_type, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                file_path = EXCLUDED.file_path,
                is_active = EXCLUDED.is_active,
                mime_type = EXCLUDED.mime_type",
            params![
                file.id,
                file.file_path,
                file.is_active,
                file.mime_type,
                file.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // === Typed reads ===

    pub fn get_wallet(&self, id: Uuid) -> Result<Option<Wallet>> {
        let filter = Filter::new().eq("id", id.to_string());
        self.find_many(tables::WALLETS, &filter, Some(1))?
            .into_iter()
            .next()
            .map(decode_record)
            .transpose()
    }

    pub fn get_wallets_for_account(&self, account_id: Uuid) -> Result<Vec<Wallet>> {
        let filter = Filter::new().eq("account_id", account_id.to_string());
        self.find_many(tables::WALLETS, &filter, None)?
            .into_iter()
            .map(decode_record)
            .collect()
    }
}

#[async_trait]
impl RemoteStore for DuckDbStore {
    async fn find_one(&self, table: &str, filter: &Filter) -> Result<Option<Record>> {
        let conn = Arc::clone(&self.conn);
        let table = table.to_string();
        let filter = filter.clone();
        let rows = tokio::task::spawn_blocking(move || select_records(&conn, &table, &filter, Some(1)))
            .await
            .map_err(|e| Error::store(format!("store query task failed: {}", e)))??;
        Ok(rows.into_iter().next())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.public_base_url, bucket, path)
    }
}

/// `{base}/storage/v1/object/public/{bucket}/{path}`
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket.trim_matches('/'),
        path.trim_start_matches('/')
    )
}
