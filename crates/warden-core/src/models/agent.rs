//! Agent identity and trust state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Operational status. Agents are never deleted, only transitioned.
    pub enum AgentStatus {
        Active => "ACTIVE",
        Quarantined => "QUARANTINED",
    }
}

wire_enum! {
    /// Behavioral tier derived from the trust score.
    #[derive(PartialOrd, Ord)]
    pub enum TrustStage {
        /// Calculus-based trust: probationary, score <= 0.5.
        Cbt => "CBT",
        /// Knowledge-based trust: standard, 0.5 < score <= 0.8.
        Kbt => "KBT",
        /// Identification-based trust: high, score > 0.8.
        Ibt => "IBT",
    }
}

/// A registered agent as persisted in the agent registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// DID-like identity, unique across all workspaces.
    pub agent_id: String,
    pub workspace_id: String,
    pub role: String,
    /// Always in [0, 1].
    pub trust_score: f64,
    pub trust_stage: TrustStage,
    /// Share of network influence after normalization. In [0, 1].
    pub influence_weight: f64,
    pub verification_count: u32,
    /// Micro-penalties applied on `penalty_reset_date`.
    pub daily_penalty_sum: f64,
    pub penalty_reset_date: NaiveDate,
    pub status: AgentStatus,
    pub created_at: DateTime<Utc>,
    pub last_trust_update: DateTime<Utc>,
}

impl Agent {
    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }
}
