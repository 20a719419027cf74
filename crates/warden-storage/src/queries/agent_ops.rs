//! Raw SQL operations for the agent registry.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use warden_core::errors::WardenResult;
use warden_core::models::{Agent, AgentStatus, TrustStage};

use super::{collect_rows, parse_date, parse_ts, parse_wire};
use crate::{fmt_ts, to_storage_err};

const AGENT_COLUMNS: &str = "agent_id, workspace_id, role, trust_score, trust_stage, \
     influence_weight, verification_count, daily_penalty_sum, penalty_reset_date, status, \
     created_at, last_trust_update";

fn agent_from_row(row: &Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        agent_id: row.get(0)?,
        workspace_id: row.get(1)?,
        role: row.get(2)?,
        trust_score: row.get(3)?,
        trust_stage: parse_wire(4, row.get(4)?, TrustStage::from_str_name)?,
        influence_weight: row.get(5)?,
        verification_count: row.get(6)?,
        daily_penalty_sum: row.get(7)?,
        penalty_reset_date: parse_date(8, row.get(8)?)?,
        status: parse_wire(9, row.get(9)?, AgentStatus::from_str_name)?,
        created_at: parse_ts(10, row.get(10)?)?,
        last_trust_update: parse_ts(11, row.get(11)?)?,
    })
}

/// Insert a new agent.
pub fn insert_agent(conn: &Connection, agent: &Agent) -> WardenResult<()> {
    debug!(agent_id = %agent.agent_id, role = %agent.role, "inserting agent");
    conn.execute(
        &format!("INSERT INTO agents ({AGENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
        params![
            agent.agent_id,
            agent.workspace_id,
            agent.role,
            agent.trust_score,
            agent.trust_stage.as_str(),
            agent.influence_weight,
            agent.verification_count,
            agent.daily_penalty_sum,
            agent.penalty_reset_date.format("%Y-%m-%d").to_string(),
            agent.status.as_str(),
            fmt_ts(&agent.created_at),
            fmt_ts(&agent.last_trust_update),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// True when the identity exists in any workspace. Identities are global.
pub fn agent_exists_anywhere(conn: &Connection, agent_id: &str) -> WardenResult<bool> {
    conn.query_row(
        "SELECT 1 FROM agents WHERE agent_id = ?1",
        params![agent_id],
        |_| Ok(()),
    )
    .optional()
    .map(|r| r.is_some())
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_agent(conn: &Connection, workspace_id: &str, agent_id: &str) -> WardenResult<Option<Agent>> {
    debug!(agent_id, "getting agent");
    conn.query_row(
        &format!("SELECT {AGENT_COLUMNS} FROM agents WHERE workspace_id = ?1 AND agent_id = ?2"),
        params![workspace_id, agent_id],
        agent_from_row,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// List agents, optionally filtered by status, ordered by id.
pub fn list_agents(
    conn: &Connection,
    workspace_id: &str,
    status: Option<AgentStatus>,
) -> WardenResult<Vec<Agent>> {
    debug!(?status, "listing agents");
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {AGENT_COLUMNS} FROM agents
             WHERE workspace_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY agent_id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, status.map(|s| s.as_str())], agent_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}

/// Persist the mutable trust fields of an agent as one statement.
pub fn update_trust_state(conn: &Connection, agent: &Agent) -> WardenResult<()> {
    debug!(agent_id = %agent.agent_id, score = agent.trust_score, "updating trust state");
    conn.execute(
        "UPDATE agents SET
            trust_score = ?3,
            trust_stage = ?4,
            verification_count = ?5,
            daily_penalty_sum = ?6,
            penalty_reset_date = ?7,
            last_trust_update = ?8
         WHERE workspace_id = ?1 AND agent_id = ?2",
        params![
            agent.workspace_id,
            agent.agent_id,
            agent.trust_score,
            agent.trust_stage.as_str(),
            agent.verification_count,
            agent.daily_penalty_sum,
            agent.penalty_reset_date.format("%Y-%m-%d").to_string(),
            fmt_ts(&agent.last_trust_update),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_status(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
    status: AgentStatus,
) -> WardenResult<()> {
    debug!(agent_id, %status, "updating agent status");
    conn.execute(
        "UPDATE agents SET status = ?3 WHERE workspace_id = ?1 AND agent_id = ?2",
        params![workspace_id, agent_id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_influence_weight(
    conn: &Connection,
    workspace_id: &str,
    agent_id: &str,
    weight: f64,
) -> WardenResult<()> {
    conn.execute(
        "UPDATE agents SET influence_weight = ?3 WHERE workspace_id = ?1 AND agent_id = ?2",
        params![workspace_id, agent_id, weight],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Agents whose last trust update is older than `before`, for decay sweeps.
pub fn list_idle_since(
    conn: &Connection,
    workspace_id: &str,
    before: &DateTime<Utc>,
) -> WardenResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT agent_id FROM agents
             WHERE workspace_id = ?1 AND last_trust_update < ?2
             ORDER BY agent_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![workspace_id, fmt_ts(before)], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_rows(rows)
}
