//! Hash-chained ledger records.

use serde::{Deserialize, Serialize};

use super::RiskGrade;

wire_enum! {
    /// Every kind of event the ledger records.
    pub enum EventType {
        AuditPass => "AUDIT_PASS",
        AuditFail => "AUDIT_FAIL",
        AuditReview => "AUDIT_REVIEW",
        AuditDeferred => "AUDIT_DEFERRED",
        L3ApprovalRequest => "L3_APPROVAL_REQUEST",
        L3Approved => "L3_APPROVED",
        L3Rejected => "L3_REJECTED",
        L3SlaBreach => "L3_SLA_BREACH",
        TrustUpdate => "TRUST_UPDATE",
        Penalty => "PENALTY",
        QuarantineStarted => "QUARANTINE_STARTED",
        QuarantineReleased => "QUARANTINE_RELEASED",
        ModeChange => "MODE_CHANGE",
        Normalization => "NORMALIZATION",
        HaltCleared => "HALT_CLEARED",
    }
}

/// An immutable ledger record.
///
/// `entry_hash = H(timestamp ∥ signer ∥ payload ∥ prev_hash)` where `payload`
/// is the canonical JSON text exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: i64,
    /// RFC 3339 UTC with microsecond precision. Hashed verbatim.
    pub timestamp: String,
    pub signer: String,
    pub event_type: EventType,
    pub risk_grade: RiskGrade,
    /// Canonical JSON (sorted keys, compact).
    pub payload: String,
    pub entry_hash: String,
    pub prev_hash: String,
    pub signature: String,
}

impl LedgerEntry {
    /// Parse the stored payload back into JSON.
    pub fn payload_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.payload)
    }
}
