//! Raw SQL operations for the trust-update history.

use rusqlite::{params, Connection};
use tracing::debug;

use warden_core::errors::WardenResult;
use warden_core::models::{TrustUpdateKind, TrustUpdateRecord};

use super::{collect_rows, parse_ts, parse_wire};
use crate::{fmt_ts, to_storage_err};

/// Append one history row and return its id.
pub fn insert_trust_update(
    conn: &Connection,
    workspace_id: &str,
    record: &TrustUpdateRecord,
) -> WardenResult<i64> {
    debug!(agent_id = %record.agent_id, kind = %record.kind, delta = record.delta, "inserting trust update");
    conn.execute(
        "INSERT INTO trust_updates
            (workspace_id, agent_id, old_score, new_score, delta, kind, context, ledger_ref, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            workspace_id,
            record.agent_id,
            record.old_score,
            record.new_score,
            record.delta,
            record.kind.as_str(),
            record.context,
            record.ledger_ref,
            fmt_ts(&record.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Most recent history rows for an agent, newest first.
pub fn list_trust_updates(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
    limit: usize,
) -> WardenResult<Vec<TrustUpdateRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, agent_id, old_score, new_score, delta, kind, context, ledger_ref, created_at
             FROM trust_updates
             WHERE workspace_id = ?1 AND agent_id = ?2
             ORDER BY id DESC LIMIT ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, agent_id, limit as i64], |row| {
            Ok(TrustUpdateRecord {
                id: row.get(0)?,
                agent_id: row.get(1)?,
                old_score: row.get(2)?,
                new_score: row.get(3)?,
                delta: row.get(4)?,
                kind: parse_wire(5, row.get(5)?, TrustUpdateKind::from_str_name)?,
                context: row.get(6)?,
                ledger_ref: row.get(7)?,
                created_at: parse_ts(8, row.get(8)?)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}
