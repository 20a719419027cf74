//! # warden-core
//!
//! Foundation crate for the Warden governance system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::WardenConfig;
pub use errors::{WardenError, WardenErrorCode, WardenResult};
pub use models::{
    Agent, AgentStatus, AuditVerdict, EventType, Finding, FindingCategory, LedgerEntry,
    OperatingMode, QuarantineRecord, QuarantineStatus, QuarantineTrack, RiskGrade, Severity,
    SourceRecord, SourceTier, TrustStage, TrustUpdateKind, TrustUpdateRecord, Verdict,
};
