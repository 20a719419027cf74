use serde::{Deserialize, Serialize};

use super::defaults;

/// Service level for the L3 approval queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// Hours an overseer has to decide a queued L3 request. Default: 24.
    pub sla_hours: i64,
    /// A breach older than this many hours is CRITICAL. Default: 12.
    pub critical_after_hours: i64,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            sla_hours: defaults::DEFAULT_L3_SLA_HOURS,
            critical_after_hours: defaults::DEFAULT_SLA_CRITICAL_AFTER_HOURS,
        }
    }
}
