//! StorageEngine: owns the ConnectionPool, runs migrations at startup and
//! routes reads and writes to the right connection.

use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use warden_core::config::StorageConfig;
use warden_core::constants::DEFAULT_WORKSPACE_ID;
use warden_core::errors::WardenResult;

use crate::migrations;
use crate::pool::ConnectionPool;

/// The storage engine. Every consumer holds it behind an `Arc` and scopes its
/// queries by [`StorageEngine::workspace_id`].
pub struct StorageEngine {
    pool: ConnectionPool,
    workspace_id: String,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, config: &StorageConfig) -> WardenResult<Self> {
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let engine = Self {
            pool,
            workspace_id: config.workspace_id.clone(),
        };
        engine.initialize()?;
        info!(path = %path.display(), workspace_id = %engine.workspace_id, "storage opened");
        Ok(engine)
    }

    /// Open an in-memory engine for the default workspace (for testing).
    pub fn open_in_memory() -> WardenResult<Self> {
        Self::open_in_memory_for(DEFAULT_WORKSPACE_ID)
    }

    /// Open an in-memory engine scoped to `workspace_id` (for testing).
    pub fn open_in_memory_for(workspace_id: &str) -> WardenResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
            workspace_id: workspace_id.to_string(),
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> WardenResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Tenant every query issued through this engine is scoped to.
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run `f` on the single write connection. Callers that need atomicity
    /// wrap their body in [`crate::immediate_transaction`].
    pub async fn with_writer<F, T>(&self, f: F) -> WardenResult<T>
    where
        F: FnOnce(&Connection) -> WardenResult<T>,
    {
        self.pool.writer.with_conn(f).await
    }

    /// Run a read-only closure.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer.
    pub async fn with_reader<F, T>(&self, f: F) -> WardenResult<T>
    where
        F: FnOnce(&Connection) -> WardenResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn(f).await,
        }
    }
}
