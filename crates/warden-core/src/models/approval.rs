use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum ApprovalStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

/// An L3 artifact waiting on (or decided by) a human overseer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub queue_id: i64,
    pub artifact_hash: String,
    pub requesting_agent: String,
    pub reason: String,
    pub status: ApprovalStatus,
    pub requested_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub overseer_notes: Option<String>,
}

wire_enum! {
    pub enum SlaSeverity {
        Warning => "WARNING",
        Critical => "CRITICAL",
    }
}

/// A pending request whose overseer deadline has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaNotice {
    pub queue_id: i64,
    pub artifact_hash: String,
    pub requesting_agent: String,
    pub deadline: DateTime<Utc>,
    pub hours_overdue: f64,
    pub severity: SlaSeverity,
}

/// Queue-wide SLA compliance at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaStatus {
    pub pending_count: usize,
    pub overdue_count: usize,
    /// Requests approved or rejected, ever.
    pub completed_count: u64,
    /// Share of pending requests still inside their deadline; 100 when
    /// nothing is pending.
    pub compliance_pct: f64,
    pub oldest_pending: Option<DateTime<Utc>>,
    pub next_deadline: Option<DateTime<Utc>>,
}
