//! Raw SQL operations for the ledger table. Insert and select only.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use warden_core::errors::WardenResult;
use warden_core::models::{EventType, LedgerEntry, RiskGrade};

use super::{collect_rows, parse_wire};
use crate::to_storage_err;

const ENTRY_COLUMNS: &str =
    "entry_id, timestamp, signer, event_type, risk_grade, payload, entry_hash, prev_hash, signature";

/// Parameters for inserting a ledger entry.
pub struct InsertEntryParams<'a> {
    pub workspace_id: &'a str,
    pub timestamp: &'a str,
    pub signer: &'a str,
    pub event_type: &'a str,
    pub risk_grade: &'a str,
    pub payload: &'a str,
    pub entry_hash: &'a str,
    pub prev_hash: &'a str,
    pub signature: &'a str,
}

/// Filter for the read-only query surface.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter<'a> {
    pub event_type: Option<&'a str>,
    /// Only entries with `entry_id > after_id`.
    pub after_id: Option<i64>,
    pub limit: Option<usize>,
    /// Default is descending by `entry_id`.
    pub ascending: bool,
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    Ok(LedgerEntry {
        entry_id: row.get(0)?,
        timestamp: row.get(1)?,
        signer: row.get(2)?,
        event_type: parse_wire(3, row.get(3)?, EventType::from_str_name)?,
        risk_grade: parse_wire(4, row.get(4)?, RiskGrade::from_str_name)?,
        payload: row.get(5)?,
        entry_hash: row.get(6)?,
        prev_hash: row.get(7)?,
        signature: row.get(8)?,
    })
}

/// Insert an entry and return its sequence id.
pub fn insert_entry(conn: &Connection, p: &InsertEntryParams<'_>) -> WardenResult<i64> {
    debug!(event_type = p.event_type, entry_hash = p.entry_hash, "inserting ledger entry");
    conn.execute(
        "INSERT INTO ledger_entries
            (workspace_id, timestamp, signer, event_type, risk_grade, payload, entry_hash, prev_hash, signature)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            p.workspace_id,
            p.timestamp,
            p.signer,
            p.event_type,
            p.risk_grade,
            p.payload,
            p.entry_hash,
            p.prev_hash,
            p.signature,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Hash of the newest entry in the workspace chain, if any.
pub fn tail_hash(conn: &Connection, workspace_id: &str) -> WardenResult<Option<String>> {
    conn.query_row(
        "SELECT entry_hash FROM ledger_entries
         WHERE workspace_id = ?1 ORDER BY entry_id DESC LIMIT 1",
        params![workspace_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_entry(
    conn: &Connection,
    workspace_id: &str,
    entry_id: i64,
) -> WardenResult<Option<LedgerEntry>> {
    conn.query_row(
        &format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE workspace_id = ?1 AND entry_id = ?2"
        ),
        params![workspace_id, entry_id],
        entry_from_row,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// The full workspace chain in append order, for replay.
pub fn list_chain(conn: &Connection, workspace_id: &str) -> WardenResult<Vec<LedgerEntry>> {
    query_entries(
        conn,
        workspace_id,
        &EntryFilter {
            ascending: true,
            ..Default::default()
        },
    )
}

/// Filtered listing backing the dashboard/CLI query surface.
pub fn query_entries(
    conn: &Connection,
    workspace_id: &str,
    filter: &EntryFilter<'_>,
) -> WardenResult<Vec<LedgerEntry>> {
    debug!(?filter, "querying ledger entries");
    let mut sql = format!("SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE workspace_id = ?1");
    let mut bound: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(workspace_id.to_string())];

    if let Some(event_type) = filter.event_type {
        bound.push(Box::new(event_type.to_string()));
        sql.push_str(&format!(" AND event_type = ?{}", bound.len()));
    }
    if let Some(after_id) = filter.after_id {
        bound.push(Box::new(after_id));
        sql.push_str(&format!(" AND entry_id > ?{}", bound.len()));
    }
    sql.push_str(if filter.ascending {
        " ORDER BY entry_id ASC"
    } else {
        " ORDER BY entry_id DESC"
    });
    if let Some(limit) = filter.limit {
        bound.push(Box::new(limit as i64));
        sql.push_str(&format!(" LIMIT ?{}", bound.len()));
    }

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> = bound.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), entry_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

pub fn count_entries(conn: &Connection, workspace_id: &str) -> WardenResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM ledger_entries WHERE workspace_id = ?1",
        params![workspace_id],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}
