//! # warden-storage
//!
//! SQLite persistence for the governance system: a single serialized writer,
//! a read-only connection pool, versioned migrations, and raw query modules.
//! Every query is scoped by an exact-match `workspace_id` filter.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::Connection;

use warden_core::errors::{StorageError, WardenError, WardenResult};

pub use engine::StorageEngine;

/// Wrap a rusqlite error message as a storage error.
pub fn to_storage_err(message: String) -> WardenError {
    if message.contains("append-only") {
        // Raised by the ledger triggers.
        return WardenError::Storage(StorageError::AppendOnlyViolation {
            table: "ledger_entries".to_string(),
        });
    }
    WardenError::Storage(StorageError::SqliteError { message })
}

/// `ts` at the precision it is stored with, so a returned record equals
/// its persisted round trip.
pub fn stored_ts(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// Current time at stored precision.
pub fn now_ts() -> DateTime<Utc> {
    stored_ts(Utc::now())
}

/// Canonical timestamp encoding for every TEXT time column.
pub fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Run `f` inside `BEGIN IMMEDIATE … COMMIT`, rolling back on error.
///
/// The caller must already hold the write connection.
pub fn immediate_transaction<T, F>(conn: &Connection, f: F) -> WardenResult<T>
where
    F: FnOnce(&Connection) -> WardenResult<T>,
{
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(e.to_string()))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(value)
        }
        Err(err) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(err)
        }
    }
}
