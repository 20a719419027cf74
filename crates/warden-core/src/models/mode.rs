use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Global operating mode. Exactly one is active at a time.
    pub enum OperatingMode {
        /// Verify everything.
        Normal => "NORMAL",
        /// Sample L1, fully verify L2 and L3.
        Lean => "LEAN",
        /// Defer L1, prioritize L2 and L3.
        Surge => "SURGE",
        /// Only L3, human-in-the-loop.
        Safe => "SAFE",
    }
}

impl Default for OperatingMode {
    fn default() -> Self {
        Self::Normal
    }
}

/// Persisted system state row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub mode: OperatingMode,
    pub mode_reason: String,
    pub mode_changed_at: DateTime<Utc>,
    /// Set when ledger replay detected tampering. Blocks all appends.
    pub integrity_halt: Option<String>,
}
