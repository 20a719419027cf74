//! Source Credibility Index records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RiskGrade;

wire_enum! {
    /// Provenance tier of a cited source. `T1` is the most authoritative.
    #[derive(PartialOrd, Ord)]
    pub enum SourceTier {
        /// Official specifications and standards bodies.
        T1 => "T1",
        /// Reviewed vendor and project documentation.
        T2 => "T2",
        /// General technical reporting.
        T3 => "T3",
        /// Community or generated content. The default.
        T4 => "T4",
    }
}

impl SourceTier {
    /// Fixed starting credibility for the tier.
    pub fn base_credibility(self) -> f64 {
        match self {
            Self::T1 => 100.0,
            Self::T2 => 90.0,
            Self::T3 => 70.0,
            Self::T4 => 45.0,
        }
    }
}

/// A tracked source. `sci` stays within `[0, base_credibility]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source_id: String,
    pub url: String,
    pub domain: String,
    pub tier: SourceTier,
    pub base_credibility: f64,
    pub sci: f64,
    pub citation_count: u32,
    pub failure_count: u32,
    pub last_verified: Option<DateTime<Utc>>,
}

wire_enum! {
    /// What a credibility check decided for the citing artifact.
    pub enum CredibilityAction {
        Accept => "ACCEPT",
        Escalate => "ESCALATE",
        Reject => "REJECT",
    }
}

/// Outcome of checking one source against an artifact's grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityCheck {
    pub source_id: String,
    pub url: String,
    pub tier: SourceTier,
    pub sci: f64,
    pub action: CredibilityAction,
    pub original_grade: RiskGrade,
    /// Never lower than `original_grade`.
    pub resulting_grade: RiskGrade,
    pub reason: String,
}
