//! Raw SQL operations for the source-credibility table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use warden_core::errors::WardenResult;
use warden_core::models::{SourceRecord, SourceTier};

use super::{collect_rows, parse_opt_ts, parse_wire};
use crate::{fmt_ts, to_storage_err};

const SOURCE_COLUMNS: &str = "source_id, url, domain, tier, base_credibility, sci, \
     citation_count, failure_count, last_verified";

fn source_from_row(row: &Row<'_>) -> rusqlite::Result<SourceRecord> {
    Ok(SourceRecord {
        source_id: row.get(0)?,
        url: row.get(1)?,
        domain: row.get(2)?,
        tier: parse_wire(3, row.get(3)?, SourceTier::from_str_name)?,
        base_credibility: row.get(4)?,
        sci: row.get(5)?,
        citation_count: row.get(6)?,
        failure_count: row.get(7)?,
        last_verified: parse_opt_ts(8, row.get(8)?)?,
    })
}

/// Insert a source, leaving an existing row untouched. Returns true if inserted.
pub fn insert_source(
    conn: &Connection,
    workspace_id: &str,
    source: &SourceRecord,
    created_at: &str,
) -> WardenResult<bool> {
    debug!(source_id = %source.source_id, tier = %source.tier, "inserting source");
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO source_credibility
                (workspace_id, source_id, url, domain, tier, base_credibility, sci,
                 citation_count, failure_count, last_verified, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                workspace_id,
                source.source_id,
                source.url,
                source.domain,
                source.tier.as_str(),
                source.base_credibility,
                source.sci,
                source.citation_count,
                source.failure_count,
                source.last_verified.as_ref().map(fmt_ts),
                created_at,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

pub fn get_source(
    conn: &Connection,
    workspace_id: &str,
    source_id: &str,
) -> WardenResult<Option<SourceRecord>> {
    conn.query_row(
        &format!(
            "SELECT {SOURCE_COLUMNS} FROM source_credibility
             WHERE workspace_id = ?1 AND source_id = ?2"
        ),
        params![workspace_id, source_id],
        source_from_row,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Write back SCI and counters after a verification outcome.
pub fn update_source_stats(
    conn: &Connection,
    workspace_id: &str,
    source: &SourceRecord,
) -> WardenResult<()> {
    debug!(source_id = %source.source_id, sci = source.sci, "updating source stats");
    conn.execute(
        "UPDATE source_credibility SET
            sci = ?3, citation_count = ?4, failure_count = ?5, last_verified = ?6
         WHERE workspace_id = ?1 AND source_id = ?2",
        params![
            workspace_id,
            source.source_id,
            source.sci,
            source.citation_count,
            source.failure_count,
            source.last_verified.as_ref().map(fmt_ts),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Sources with SCI strictly below `threshold`, lowest first.
pub fn list_below(
    conn: &Connection,
    workspace_id: &str,
    threshold: f64,
) -> WardenResult<Vec<SourceRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SOURCE_COLUMNS} FROM source_credibility
             WHERE workspace_id = ?1 AND sci < ?2
             ORDER BY sci ASC, source_id ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, threshold], source_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}
