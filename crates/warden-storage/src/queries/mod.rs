//! Raw SQL operations. No business logic, just persistence.
//!
//! Every function takes the `workspace_id` it is scoped to and filters on it
//! by exact match.

pub mod agent_ops;
pub mod approval_ops;
pub mod calibration_ops;
pub mod ledger_ops;
pub mod quarantine_ops;
pub mod source_ops;
pub mod state_ops;
pub mod trust_ops;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;

/// Parse an RFC 3339 column inside a row mapper.
pub(crate) fn parse_ts(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_opt_ts(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|r| parse_ts(idx, r)).transpose()
}

pub(crate) fn parse_date(idx: usize, raw: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse a wire-enum column inside a row mapper.
pub(crate) fn parse_wire<T>(
    idx: usize,
    raw: String,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized value {raw:?}").into(),
        )
    })
}

/// Collect a `query_map` iterator, converting errors once.
pub(crate) fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> warden_core::errors::WardenResult<Vec<T>> {
    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| crate::to_storage_err(e.to_string()))?);
    }
    Ok(results)
}
