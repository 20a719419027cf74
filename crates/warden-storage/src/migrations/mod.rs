//! Versioned schema migrations, gated by `PRAGMA user_version`.

pub mod v001_ledger;
pub mod v002_agents;
pub mod v003_credibility;
pub mod v004_governance;
pub mod v005_calibration;

use rusqlite::Connection;
use tracing::info;

use warden_core::errors::{StorageError, WardenResult};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> WardenResult<()>;

const MIGRATIONS: &[(u32, &str, MigrationFn)] = &[
    (1, "ledger", v001_ledger::migrate),
    (2, "agents", v002_agents::migrate),
    (3, "credibility", v003_credibility::migrate),
    (4, "governance", v004_governance::migrate),
    (5, "calibration", v005_calibration::migrate),
];

/// Highest schema version this build knows about.
pub const LATEST_VERSION: u32 = 5;

/// Current schema version of the database.
pub fn current_version(conn: &Connection) -> WardenResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the stored version, each in its own
/// transaction. Returns the resulting version.
pub fn run_migrations(conn: &Connection) -> WardenResult<u32> {
    let mut version = current_version(conn)?;
    if version > LATEST_VERSION {
        return Err(StorageError::MigrationFailed {
            version,
            reason: format!("database is newer than this build (latest {LATEST_VERSION})"),
        }
        .into());
    }

    let start = version;
    for (target, name, migrate) in MIGRATIONS.iter().filter(|(v, _, _)| *v > start) {
        info!(version = target, name, "applying migration");
        crate::immediate_transaction(conn, |conn| {
            migrate(conn).map_err(|e| StorageError::MigrationFailed {
                version: *target,
                reason: e.to_string(),
            })?;
            conn.pragma_update(None, "user_version", target)
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        })?;
        version = *target;
    }
    Ok(version)
}
