// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! SQLite-backed storage for the captable service: the investor ledger
//! and the payout engine share one injected connection. All cross-row
//! consistency is delegated to SQLite's transaction primitive; the only
//! multi-row operation is the monthly distribution run.

use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::Path;

mod investors;
mod payouts;

pub const CRATE_NAME: &str = "captable-store";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    /// Out-of-range numeric field, unparsable period, zero amount.
    /// Raised before any store round trip.
    Validation(String),
    /// A referenced id does not exist, including deletes affecting zero
    /// rows.
    NotFound(String),
    /// Any failure from SQLite: connectivity, constraint violation,
    /// transaction abort. Never retried here.
    Storage(String),
}

impl LedgerError {
    pub(crate) fn storage(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) | Self::Storage(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for LedgerError {}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS investors (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  full_name TEXT NOT NULL,
  invested_amount REAL NOT NULL DEFAULT 0 CHECK (invested_amount >= 0),
  share_percent REAL NOT NULL CHECK (share_percent > 0 AND share_percent <= 100),
  created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
CREATE TABLE IF NOT EXISTS payouts (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  investor_id INTEGER NOT NULL REFERENCES investors(id),
  period_month TEXT,
  period_date TEXT,
  company_revenue REAL,
  payout_amount REAL NOT NULL,
  reinvest INTEGER NOT NULL DEFAULT 0,
  is_withdrawal_profit INTEGER NOT NULL DEFAULT 0,
  is_withdrawal_capital INTEGER NOT NULL DEFAULT 0,
  is_topup INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
  CHECK ((period_month IS NULL) <> (period_date IS NULL))
);
CREATE INDEX IF NOT EXISTS idx_payouts_investor_id ON payouts(investor_id);
";

/// The shared storage handle. Held behind a mutex by the server and
/// injected into every operation; never ambient global state.
pub struct LedgerStore {
    conn: Connection,
}

impl LedgerStore {
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path).map_err(LedgerError::storage)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory().map_err(LedgerError::storage)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, LedgerError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA foreign_keys=ON;
            ",
        )
        .map_err(LedgerError::storage)?;
        conn.execute_batch(SCHEMA).map_err(LedgerError::storage)?;
        Ok(Self { conn })
    }
}
