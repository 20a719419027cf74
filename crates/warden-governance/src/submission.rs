//! Result types returned by the governance engine.

use serde::Serialize;

use warden_core::models::{AuditVerdict, CredibilityCheck, OperatingMode, TrustUpdateRecord};

/// Outcome of one [`submit`](crate::GovernanceEngine::submit).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub agent_id: String,
    /// The audit verdict after source-credibility escalation.
    pub verdict: AuditVerdict,
    pub credibility: Vec<CredibilityCheck>,
    pub ledger_entry_id: i64,
    /// Hash of the ledger entry recording this submission.
    pub ledger_hash: String,
    /// Set when the artifact went to the L3 approval queue.
    pub queue_id: Option<i64>,
    /// The mode gate held the verdict back. Nothing but the deferral was
    /// recorded and trust is untouched.
    pub deferred: bool,
    pub defer_reason: Option<String>,
    /// None for deferred and pending-review outcomes.
    pub trust_update: Option<TrustUpdateRecord>,
}

/// Dashboard view of one workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub mode: OperatingMode,
    pub mode_reason: String,
    pub integrity_halt: Option<String>,
    pub pending_approvals: usize,
    /// Pending approvals past their overseer deadline.
    pub overdue_approvals: usize,
    pub active_quarantines: usize,
    pub ledger_entries: u64,
}
