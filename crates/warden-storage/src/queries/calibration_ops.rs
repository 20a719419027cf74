//! Raw SQL operations for the prediction calibration log.

use rusqlite::{params, Connection};

use warden_core::errors::WardenResult;

use super::collect_rows;
use crate::to_storage_err;

/// Lifetime aggregates for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationTotals {
    pub count: u64,
    pub accuracy: Option<f64>,
    pub average_confidence: Option<f64>,
}

pub fn insert_prediction(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
    confidence: f64,
    correct: bool,
    brier: f64,
    recorded_at: &str,
) -> WardenResult<i64> {
    conn.execute(
        "INSERT INTO calibration_log
            (workspace_id, agent_id, confidence, correct, brier, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![workspace_id, agent_id, confidence, correct, brier, recorded_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Brier contributions of the `window` most recent predictions, newest first.
pub fn recent_contributions(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
    window: usize,
) -> WardenResult<Vec<f64>> {
    let mut stmt = conn
        .prepare(
            "SELECT brier FROM calibration_log
             WHERE workspace_id = ?1 AND agent_id = ?2
             ORDER BY log_id DESC LIMIT ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, agent_id, window as i64], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

pub fn totals(conn: &Connection, workspace_id: &str, agent_id: &str) -> WardenResult<CalibrationTotals> {
    conn.query_row(
        "SELECT COUNT(*), AVG(correct), AVG(confidence) FROM calibration_log
         WHERE workspace_id = ?1 AND agent_id = ?2",
        params![workspace_id, agent_id],
        |row| {
            Ok(CalibrationTotals {
                count: row.get::<_, i64>(0)? as u64,
                accuracy: row.get(1)?,
                average_confidence: row.get(2)?,
            })
        },
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
