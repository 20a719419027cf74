//! v003: source credibility and agent quarantine.

use rusqlite::Connection;

use warden_core::errors::WardenResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WardenResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS source_credibility (
            workspace_id     TEXT NOT NULL,
            source_id        TEXT NOT NULL,
            url              TEXT NOT NULL,
            domain           TEXT NOT NULL,
            tier             TEXT NOT NULL,
            base_credibility REAL NOT NULL,
            sci              REAL NOT NULL CHECK (sci >= 0.0 AND sci <= base_credibility),
            citation_count   INTEGER NOT NULL DEFAULT 0,
            failure_count    INTEGER NOT NULL DEFAULT 0,
            last_verified    TEXT,
            created_at       TEXT NOT NULL,
            PRIMARY KEY (workspace_id, source_id)
        );

        CREATE INDEX IF NOT EXISTS idx_source_sci ON source_credibility(workspace_id, sci);

        CREATE TABLE IF NOT EXISTS agent_quarantine (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            workspace_id TEXT NOT NULL,
            agent_id     TEXT NOT NULL,
            reason       TEXT NOT NULL,
            track        TEXT NOT NULL,
            started_at   TEXT NOT NULL,
            ends_at      TEXT NOT NULL,
            status       TEXT NOT NULL DEFAULT 'ACTIVE',
            FOREIGN KEY (agent_id) REFERENCES agents(agent_id)
        );

        CREATE INDEX IF NOT EXISTS idx_quarantine_agent
            ON agent_quarantine(workspace_id, agent_id, status);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
