use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Quarantine track. Determines how long the agent is suspended.
    pub enum QuarantineTrack {
        /// Coaching only; released immediately.
        HonestError => "HONEST_ERROR",
        /// Timed suspension.
        Manipulation => "MANIPULATION",
    }
}

wire_enum! {
    pub enum QuarantineStatus {
        Active => "ACTIVE",
        /// Expired naturally.
        Completed => "COMPLETED",
        /// Released early by an operator.
        Lifted => "LIFTED",
    }
}

/// A quarantine window. Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantineRecord {
    pub id: i64,
    pub agent_id: String,
    pub reason: String,
    pub track: QuarantineTrack,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: QuarantineStatus,
}

impl QuarantineRecord {
    /// Active and not yet past `ends_at` at `now`.
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.status == QuarantineStatus::Active && self.ends_at > now
    }
}
