use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::DEFAULT_WORKSPACE_ID;

/// SQLite storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database filename, relative to the project root. Default: "warden.db".
    pub db_filename: String,
    /// Number of read-only connections. Default: 4.
    pub read_pool_size: usize,
    /// SQLite busy timeout. Default: 5000.
    pub busy_timeout_ms: u32,
    /// Tenant filter applied to every query. Default: "default".
    pub workspace_id: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_filename: defaults::DEFAULT_DB_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            workspace_id: DEFAULT_WORKSPACE_ID.to_string(),
        }
    }
}
