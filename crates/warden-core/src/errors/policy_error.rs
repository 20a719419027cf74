//! Policy rejections. Each carries the risk grade of the denied action.

use chrono::{DateTime, Utc};

use super::error_code::{self, WardenErrorCode};
use crate::models::RiskGrade;

/// An agent action denied by governance policy. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("agent {agent_id} is quarantined until {until} ({grade})")]
    Quarantined {
        agent_id: String,
        until: DateTime<Utc>,
        grade: RiskGrade,
    },

    #[error("source {url} rejected: SCI {sci:.1} is below {threshold:.1} ({grade})")]
    SourceRejected {
        url: String,
        sci: f64,
        threshold: f64,
        grade: RiskGrade,
    },

    #[error("approval request {queue_id} was already decided")]
    AlreadyDecided { queue_id: i64 },

    #[error("approval request not found: {0}")]
    ApprovalNotFound(i64),
}

impl PolicyError {
    /// Risk grade attached to the rejection, when there is one.
    pub fn risk_grade(&self) -> Option<RiskGrade> {
        match self {
            Self::Quarantined { grade, .. } | Self::SourceRejected { grade, .. } => Some(*grade),
            Self::AlreadyDecided { .. } | Self::ApprovalNotFound(_) => Some(RiskGrade::L3),
        }
    }
}

impl WardenErrorCode for PolicyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Quarantined { .. } => error_code::AGENT_QUARANTINED,
            Self::SourceRejected { .. } => error_code::SOURCE_REJECTED,
            Self::AlreadyDecided { .. } => error_code::APPROVAL_ALREADY_DECIDED,
            Self::ApprovalNotFound(_) => error_code::APPROVAL_NOT_FOUND,
        }
    }
}
