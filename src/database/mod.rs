//! SQLite persistence for walletwatch
//!
//! Two tables:
//! - `wallets`: every address ever seen, replaced wholesale on re-save
//! - `api_responses`: append-only log of extraction snapshots per endpoint
//!
//! One connection is held for the lifetime of the process. Every write runs
//! in autocommit mode, so it is durable as soon as the call returns.

mod models;
mod snapshots;
mod wallets;

pub use models::{ApiResponseSnapshot, Chain, Wallet};

use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use rusqlite::Connection;
use std::path::Path;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Self::from_connection(conn)?;

        logger::info(
            LogTag::Database,
            &format!("Connected to database: {}", path.display()),
        );
        Ok(db)
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> MonitorResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> MonitorResult<Self> {
        conn.busy_timeout(std::time::Duration::from_millis(10_000))?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn initialize_schema(conn: &Connection) -> MonitorResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS wallets (
            address TEXT PRIMARY KEY,
            chain TEXT NOT NULL,
            first_seen TEXT NOT NULL,
            first_transaction TEXT,
            label TEXT,
            balance REAL,
            raw_data TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS api_responses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            endpoint TEXT NOT NULL,
            response TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_api_responses_endpoint ON api_responses(endpoint, id DESC)",
        [],
    )?;

    logger::debug(LogTag::Database, "Database tables created/verified");
    Ok(())
}
