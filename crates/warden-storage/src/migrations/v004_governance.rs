//! v004: L3 approval queue and per-workspace system state.

use rusqlite::Connection;

use warden_core::errors::WardenResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WardenResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS l3_approval_queue (
            queue_id         INTEGER PRIMARY KEY AUTOINCREMENT,
            workspace_id     TEXT NOT NULL,
            artifact_hash    TEXT NOT NULL,
            requesting_agent TEXT NOT NULL,
            reason           TEXT NOT NULL,
            status           TEXT NOT NULL DEFAULT 'PENDING',
            requested_at     TEXT NOT NULL,
            decided_at       TEXT,
            overseer_notes   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_approval_status ON l3_approval_queue(workspace_id, status);

        CREATE TABLE IF NOT EXISTS system_state (
            workspace_id    TEXT PRIMARY KEY,
            current_mode    TEXT NOT NULL DEFAULT 'NORMAL',
            mode_reason     TEXT NOT NULL DEFAULT '',
            mode_changed_at TEXT NOT NULL,
            integrity_halt  TEXT
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
