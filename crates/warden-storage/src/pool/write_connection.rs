//! Single write connection behind `tokio::sync::Mutex`.
//! Every write in the process is serialized here, which is what linearizes
//! ledger appends.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use warden_core::errors::WardenResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection protected by an async mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> WardenResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> WardenResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, 0)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> WardenResult<T>
    where
        F: FnOnce(&Connection) -> WardenResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Non-async access for startup work (migrations). Fails instead of
    /// waiting if the writer is already held, so it is safe to call from
    /// inside a runtime.
    pub fn with_conn_sync<F, T>(&self, f: F) -> WardenResult<T>
    where
        F: FnOnce(&Connection) -> WardenResult<T>,
    {
        let guard = self
            .conn
            .try_lock()
            .map_err(|_| to_storage_err("write connection busy during startup".to_string()))?;
        f(&guard)
    }
}
