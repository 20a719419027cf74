//! Data model shared by every subsystem.

pub mod agent;
pub mod approval;
pub mod calibration;
pub mod ledger_entry;
pub mod mode;
pub mod quarantine;
pub mod risk;
pub mod source;
pub mod trust_update;
pub mod verdict;

pub use agent::{Agent, AgentStatus, TrustStage};
pub use approval::{ApprovalRequest, ApprovalStatus, SlaNotice, SlaSeverity, SlaStatus};
pub use calibration::{CalibrationReport, CalibrationStatus};
pub use ledger_entry::{EventType, LedgerEntry};
pub use mode::{OperatingMode, SystemState};
pub use quarantine::{QuarantineRecord, QuarantineStatus, QuarantineTrack};
pub use risk::{RiskContext, RiskGrade};
pub use source::{CredibilityAction, CredibilityCheck, SourceRecord, SourceTier};
pub use trust_update::{MicroPenaltyKind, TrustUpdateKind, TrustUpdateRecord};
pub use verdict::{AuditVerdict, ComplexityMeasure, Finding, FindingCategory, Severity, Verdict};
