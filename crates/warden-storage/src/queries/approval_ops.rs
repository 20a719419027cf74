//! Raw SQL operations for the L3 approval queue.

use rusqlite::{params, Connection, OptionalExtension, Row};

use warden_core::errors::WardenResult;
use warden_core::models::{ApprovalRequest, ApprovalStatus};

use super::{collect_rows, parse_opt_ts, parse_ts, parse_wire};
use crate::to_storage_err;

const APPROVAL_COLUMNS: &str = "queue_id, artifact_hash, requesting_agent, reason, status, \
     requested_at, decided_at, overseer_notes";

fn approval_from_row(row: &Row<'_>) -> rusqlite::Result<ApprovalRequest> {
    Ok(ApprovalRequest {
        queue_id: row.get(0)?,
        artifact_hash: row.get(1)?,
        requesting_agent: row.get(2)?,
        reason: row.get(3)?,
        status: parse_wire(4, row.get(4)?, ApprovalStatus::from_str_name)?,
        requested_at: parse_ts(5, row.get(5)?)?,
        decided_at: parse_opt_ts(6, row.get(6)?)?,
        overseer_notes: row.get(7)?,
    })
}

pub fn insert_request(
    conn: &Connection,
    workspace_id: &str,
    artifact_hash: &str,
    requesting_agent: &str,
    reason: &str,
    requested_at: &str,
) -> WardenResult<i64> {
    conn.execute(
        "INSERT INTO l3_approval_queue
            (workspace_id, artifact_hash, requesting_agent, reason, status, requested_at)
         VALUES (?1, ?2, ?3, ?4, 'PENDING', ?5)",
        params![workspace_id, artifact_hash, requesting_agent, reason, requested_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_request(
    conn: &Connection,
    workspace_id: &str,
    queue_id: i64,
) -> WardenResult<Option<ApprovalRequest>> {
    conn.query_row(
        &format!(
            "SELECT {APPROVAL_COLUMNS} FROM l3_approval_queue
             WHERE workspace_id = ?1 AND queue_id = ?2"
        ),
        params![workspace_id, queue_id],
        approval_from_row,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Record a decision on a PENDING request. Returns false if it was already decided.
pub fn decide_request(
    conn: &Connection,
    workspace_id: &str,
    queue_id: i64,
    status: ApprovalStatus,
    notes: &str,
    decided_at: &str,
) -> WardenResult<bool> {
    let changed = conn
        .execute(
            "UPDATE l3_approval_queue
             SET status = ?3, overseer_notes = ?4, decided_at = ?5
             WHERE workspace_id = ?1 AND queue_id = ?2 AND status = 'PENDING'",
            params![workspace_id, queue_id, status.as_str(), notes, decided_at],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

/// PENDING requests, oldest first.
pub fn list_pending(conn: &Connection, workspace_id: &str) -> WardenResult<Vec<ApprovalRequest>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {APPROVAL_COLUMNS} FROM l3_approval_queue
             WHERE workspace_id = ?1 AND status = 'PENDING'
             ORDER BY queue_id ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id], approval_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

/// Requests that have been approved or rejected.
pub fn count_decided(conn: &Connection, workspace_id: &str) -> WardenResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM l3_approval_queue
         WHERE workspace_id = ?1 AND status IN ('APPROVED', 'REJECTED')",
        params![workspace_id],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Stamp the first SLA escalation of a pending request. Returns false if
/// it was already escalated or is no longer pending.
pub fn mark_sla_escalated(
    conn: &Connection,
    workspace_id: &str,
    queue_id: i64,
    escalated_at: &str,
) -> WardenResult<bool> {
    let changed = conn
        .execute(
            "UPDATE l3_approval_queue SET sla_escalated_at = ?3
             WHERE workspace_id = ?1 AND queue_id = ?2
               AND status = 'PENDING' AND sla_escalated_at IS NULL",
            params![workspace_id, queue_id, escalated_at],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}
