//! Raw SQL operations for per-workspace system state (mode, integrity halt).

use rusqlite::{params, Connection, OptionalExtension};

use warden_core::errors::WardenResult;
use warden_core::models::{OperatingMode, SystemState};

use super::{parse_ts, parse_wire};
use crate::to_storage_err;

pub fn get_state(conn: &Connection, workspace_id: &str) -> WardenResult<Option<SystemState>> {
    conn.query_row(
        "SELECT current_mode, mode_reason, mode_changed_at, integrity_halt
         FROM system_state WHERE workspace_id = ?1",
        params![workspace_id],
        |row| {
            Ok(SystemState {
                mode: parse_wire(0, row.get(0)?, OperatingMode::from_str_name)?,
                mode_reason: row.get(1)?,
                mode_changed_at: parse_ts(2, row.get(2)?)?,
                integrity_halt: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Create the state row if missing. Existing rows are left alone.
pub fn ensure_state(
    conn: &Connection,
    workspace_id: &str,
    initial_mode: OperatingMode,
    now: &str,
) -> WardenResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO system_state (workspace_id, current_mode, mode_reason, mode_changed_at)
         VALUES (?1, ?2, 'initial', ?3)",
        params![workspace_id, initial_mode.as_str(), now],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Upsert the operating mode.
pub fn set_mode(
    conn: &Connection,
    workspace_id: &str,
    mode: OperatingMode,
    reason: &str,
    now: &str,
) -> WardenResult<()> {
    conn.execute(
        "INSERT INTO system_state (workspace_id, current_mode, mode_reason, mode_changed_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(workspace_id) DO UPDATE SET
            current_mode = excluded.current_mode,
            mode_reason = excluded.mode_reason,
            mode_changed_at = excluded.mode_changed_at",
        params![workspace_id, mode.as_str(), reason, now],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Set (`Some`) or clear (`None`) the integrity halt. Creates the state row
/// in NORMAL mode if it does not exist yet.
pub fn set_integrity_halt(
    conn: &Connection,
    workspace_id: &str,
    reason: Option<&str>,
    now: &str,
) -> WardenResult<()> {
    conn.execute(
        "INSERT INTO system_state (workspace_id, current_mode, mode_reason, mode_changed_at, integrity_halt)
         VALUES (?1, 'NORMAL', 'initial', ?3, ?2)
         ON CONFLICT(workspace_id) DO UPDATE SET integrity_halt = excluded.integrity_halt",
        params![workspace_id, reason, now],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_integrity_halt(conn: &Connection, workspace_id: &str) -> WardenResult<Option<String>> {
    conn.query_row(
        "SELECT integrity_halt FROM system_state WHERE workspace_id = ?1",
        params![workspace_id],
        |row| row.get::<_, Option<String>>(0),
    )
    .optional()
    .map(Option::flatten)
    .map_err(|e| to_storage_err(e.to_string()))
}
