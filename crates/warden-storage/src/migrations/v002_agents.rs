//! v002: agent registry and trust-update history.

use rusqlite::Connection;

use warden_core::errors::WardenResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> WardenResult<()> {
    tracing::info!("v002: creating agent and trust tables");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS agents (
            agent_id           TEXT PRIMARY KEY,
            workspace_id       TEXT NOT NULL,
            role               TEXT NOT NULL,
            trust_score        REAL NOT NULL CHECK (trust_score >= 0.0 AND trust_score <= 1.0),
            trust_stage        TEXT NOT NULL,
            influence_weight   REAL NOT NULL DEFAULT 0.0,
            verification_count INTEGER NOT NULL DEFAULT 0,
            daily_penalty_sum  REAL NOT NULL DEFAULT 0.0,
            penalty_reset_date TEXT NOT NULL,
            status             TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at         TEXT NOT NULL,
            last_trust_update  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_agents_status ON agents(workspace_id, status);

        -- One row per trust mutation.
        CREATE TABLE IF NOT EXISTS trust_updates (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            workspace_id TEXT NOT NULL,
            agent_id     TEXT NOT NULL,
            old_score    REAL NOT NULL,
            new_score    REAL NOT NULL,
            delta        REAL NOT NULL,
            kind         TEXT NOT NULL,
            context      TEXT NOT NULL DEFAULT '',
            ledger_ref   INTEGER,
            created_at   TEXT NOT NULL,
            FOREIGN KEY (agent_id) REFERENCES agents(agent_id),
            FOREIGN KEY (ledger_ref) REFERENCES ledger_entries(entry_id)
        );

        CREATE INDEX IF NOT EXISTS idx_trust_updates_agent
            ON trust_updates(workspace_id, agent_id, created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
