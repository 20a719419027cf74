//! v001: hash-chained ledger. Append-only is enforced by triggers.

use rusqlite::Connection;

use warden_core::errors::WardenResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WardenResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ledger_entries (
            entry_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            workspace_id TEXT NOT NULL,
            timestamp    TEXT NOT NULL,
            signer       TEXT NOT NULL,
            event_type   TEXT NOT NULL,
            risk_grade   TEXT NOT NULL CHECK (risk_grade IN ('L1', 'L2', 'L3')),
            payload      TEXT NOT NULL,
            entry_hash   TEXT NOT NULL,
            prev_hash    TEXT NOT NULL,
            signature    TEXT NOT NULL,
            UNIQUE (workspace_id, prev_hash)
        );

        CREATE INDEX IF NOT EXISTS idx_ledger_event ON ledger_entries(workspace_id, event_type);

        CREATE TRIGGER IF NOT EXISTS ledger_entries_no_update
        BEFORE UPDATE ON ledger_entries
        BEGIN
            SELECT RAISE(ABORT, 'ledger_entries is append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS ledger_entries_no_delete
        BEFORE DELETE ON ledger_entries
        BEGIN
            SELECT RAISE(ABORT, 'ledger_entries is append-only');
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
