//! Raw SQL operations for agent quarantine windows.

use rusqlite::{params, Connection, Row};
use tracing::debug;

use warden_core::errors::WardenResult;
use warden_core::models::{QuarantineRecord, QuarantineStatus, QuarantineTrack};

use super::{collect_rows, parse_ts, parse_wire};
use crate::{fmt_ts, to_storage_err};

const QUARANTINE_COLUMNS: &str = "id, agent_id, reason, track, started_at, ends_at, status";

fn quarantine_from_row(row: &Row<'_>) -> rusqlite::Result<QuarantineRecord> {
    Ok(QuarantineRecord {
        id: row.get(0)?,
        agent_id: row.get(1)?,
        reason: row.get(2)?,
        track: parse_wire(3, row.get(3)?, QuarantineTrack::from_str_name)?,
        started_at: parse_ts(4, row.get(4)?)?,
        ends_at: parse_ts(5, row.get(5)?)?,
        status: parse_wire(6, row.get(6)?, QuarantineStatus::from_str_name)?,
    })
}

/// Insert a quarantine window. `record.id` is ignored; the new id is returned.
pub fn insert_quarantine(
    conn: &Connection,
    workspace_id: &str,
    record: &QuarantineRecord,
) -> WardenResult<i64> {
    debug!(agent_id = %record.agent_id, track = %record.track, "inserting quarantine");
    conn.execute(
        "INSERT INTO agent_quarantine
            (workspace_id, agent_id, reason, track, started_at, ends_at, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            workspace_id,
            record.agent_id,
            record.reason,
            record.track.as_str(),
            fmt_ts(&record.started_at),
            fmt_ts(&record.ends_at),
            record.status.as_str(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// ACTIVE windows for one agent, latest end first. Includes expired-but-unswept rows.
pub fn list_active_for_agent(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
) -> WardenResult<Vec<QuarantineRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {QUARANTINE_COLUMNS} FROM agent_quarantine
             WHERE workspace_id = ?1 AND agent_id = ?2 AND status = 'ACTIVE'
             ORDER BY ends_at DESC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, agent_id], quarantine_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

/// Most recent window for an agent in any status.
pub fn latest_for_agent(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
) -> WardenResult<Option<QuarantineRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {QUARANTINE_COLUMNS} FROM agent_quarantine
             WHERE workspace_id = ?1 AND agent_id = ?2
             ORDER BY id DESC LIMIT 1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, agent_id], quarantine_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(collect_rows(rows)?.into_iter().next())
}

/// ACTIVE windows whose end is still after `now`.
pub fn list_in_force(
    conn: &Connection,
    workspace_id: &str,
    now: &str,
) -> WardenResult<Vec<QuarantineRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {QUARANTINE_COLUMNS} FROM agent_quarantine
             WHERE workspace_id = ?1 AND status = 'ACTIVE' AND ends_at > ?2
             ORDER BY ends_at ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, now], quarantine_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

/// ACTIVE windows whose end is at or before `now`.
pub fn list_expired(
    conn: &Connection,
    workspace_id: &str,
    now: &str,
) -> WardenResult<Vec<QuarantineRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {QUARANTINE_COLUMNS} FROM agent_quarantine
             WHERE workspace_id = ?1 AND status = 'ACTIVE' AND ends_at <= ?2
             ORDER BY id ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, now], quarantine_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

pub fn set_status(
    conn: &Connection,
    workspace_id: &str,
    id: i64,
    status: QuarantineStatus,
) -> WardenResult<()> {
    conn.execute(
        "UPDATE agent_quarantine SET status = ?3 WHERE workspace_id = ?1 AND id = ?2",
        params![workspace_id, id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
