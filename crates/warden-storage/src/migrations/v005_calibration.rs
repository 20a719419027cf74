//! v005: prediction calibration log and L3 SLA escalation marker.

use rusqlite::Connection;

use warden_core::errors::WardenResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WardenResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS calibration_log (
            log_id       INTEGER PRIMARY KEY AUTOINCREMENT,
            workspace_id TEXT NOT NULL,
            agent_id     TEXT NOT NULL,
            confidence   REAL NOT NULL CHECK(confidence BETWEEN 0.0 AND 1.0),
            correct      INTEGER NOT NULL CHECK(correct IN (0, 1)),
            brier        REAL NOT NULL,
            recorded_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_calibration_agent ON calibration_log(workspace_id, agent_id);

        ALTER TABLE l3_approval_queue ADD COLUMN sla_escalated_at TEXT;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
