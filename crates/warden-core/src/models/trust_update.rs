use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// What caused a trust mutation.
    pub enum TrustUpdateKind {
        Ewma => "EWMA",
        MicroPenalty => "MICRO_PENALTY",
        TemporalDecay => "TEMPORAL_DECAY",
        Violation => "VIOLATION",
        CoolingOff => "COOLING_OFF",
    }
}

wire_enum! {
    /// Minor violation classes that carry a fixed small deduction.
    pub enum MicroPenaltyKind {
        SchemaViolation => "SCHEMA_VIOLATION",
        ApiMisuse => "API_MISUSE",
        StaleCitation => "STALE_CITATION",
        Miscalibration => "MISCALIBRATION",
    }
}

/// One row of append-only trust history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustUpdateRecord {
    pub id: i64,
    pub agent_id: String,
    pub old_score: f64,
    pub new_score: f64,
    pub delta: f64,
    pub kind: TrustUpdateKind,
    pub context: String,
    pub ledger_ref: Option<i64>,
    pub created_at: DateTime<Utc>,
}
