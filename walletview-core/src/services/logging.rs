//! Logging service - persists resolution events to DuckDB
//!
//! Stores leveled events in logs.duckdb so soft failures (broken icon
//! references, denied accounts) can be reviewed later. Only identifiers and
//! messages are stored, never balances.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::log_migrations::LOG_MIGRATIONS;
use crate::ports::{LogEvent, LogLevel, LogSink};
use crate::services::migration::MigrationService;

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique ID: timestamp in the upper bits, per-millisecond counter below
fn generate_id() -> u64 {
    let timestamp = now_ms() as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// A log entry as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub app_version: String,
    pub platform: String,
    pub level: LogLevel,
    pub event: String,
    pub account_id: Option<String>,
    pub wallet_id: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

const SELECT_ENTRIES: &str = "SELECT id, timestamp, app_version, platform, level, event,
        account_id, wallet_id, message, error
 FROM sys_logs";

/// Event log backed by logs.duckdb
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
    platform: &'static str,
    min_level: LogLevel,
}

impl LoggingService {
    /// Open or create logs.duckdb in `data_dir` and run pending migrations
    pub fn new(data_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = data_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;
        MigrationService::new(&conn, LOG_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
            platform: detect_platform(),
            min_level: LogLevel::Info,
        })
    }

    /// Only persist events at or above `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Persist an event
    pub fn log(&self, event: &LogEvent) -> Result<()> {
        if event.level < self.min_level {
            return Ok(());
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_logs (
                id, timestamp, app_version, platform, level, event,
                account_id, wallet_id, message, error
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            duckdb::params![
                generate_id(),
                now_ms(),
                &self.app_version,
                self.platform,
                event.level.as_str(),
                &event.event,
                event.account_id.map(|id| id.to_string()),
                event.wallet_id.map(|id| id.to_string()),
                &event.message,
                &event.error,
            ],
        )?;
        Ok(())
    }

    /// Most recent entries first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_entries(
            &format!("{} ORDER BY timestamp DESC, id DESC LIMIT ?", SELECT_ENTRIES),
            limit,
        )
    }

    /// Most recent warn/error entries first
    pub fn get_warnings(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_entries(
            &format!(
                "{} WHERE level IN ('warn', 'error') ORDER BY timestamp DESC, id DESC LIMIT ?",
                SELECT_ENTRIES
            ),
            limit,
        )
    }

    /// Entries mentioning a wallet, most recent first
    pub fn get_for_wallet(&self, wallet_id: Uuid, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE wallet_id = ? ORDER BY timestamp DESC, id DESC LIMIT ?",
            SELECT_ENTRIES
        ))?;
        let entries = stmt
            .query_map(duckdb::params![wallet_id.to_string(), limit as i64], row_to_entry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    fn query_entries(&self, sql: &str, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let entries = stmt
            .query_map([limit as i64], row_to_entry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM sys_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete entries older than the given unix timestamp (ms)
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn row_to_entry(row: &duckdb::Row) -> duckdb::Result<LogEntry> {
    let level: String = row.get(4)?;
    Ok(LogEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        app_version: row.get(2)?,
        platform: row.get(3)?,
        level: LogLevel::from_raw(&level),
        event: row.get(5)?,
        account_id: row.get(6)?,
        wallet_id: row.get(7)?,
        message: row.get(8)?,
        error: row.get(9)?,
    })
}

impl LogSink for LoggingService {
    fn record(&self, event: LogEvent) {
        // Logging must never break resolution
        if let Err(e) = self.log(&event) {
            log::warn!("failed to persist log event {}: {}", event.event, e);
        }
    }
}
