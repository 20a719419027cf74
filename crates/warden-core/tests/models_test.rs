//! Model invariants: wire names, grade ordering, error classification.

use chrono::{Duration, Utc};
use warden_core::errors::{LedgerError, PolicyError, TrustError, WardenError, WardenErrorCode};
use warden_core::models::{
    EventType, Finding, FindingCategory, QuarantineRecord, QuarantineStatus, QuarantineTrack,
    RiskContext, RiskGrade, SourceTier, TrustStage, Verdict,
};

// ── MDL-01: wire names round trip ──

#[test]
fn wire_names_round_trip_for_every_variant() {
    for grade in RiskGrade::ALL {
        assert_eq!(RiskGrade::from_str_name(grade.as_str()), Some(*grade));
    }
    for event in EventType::ALL {
        assert_eq!(EventType::from_str_name(event.as_str()), Some(*event));
    }
    assert_eq!(Verdict::NeedsHumanReview.to_string(), "NEEDS_HUMAN_REVIEW");
    assert_eq!(TrustStage::from_str_name("IBT"), Some(TrustStage::Ibt));
    assert_eq!(RiskGrade::from_str_name("L4"), None);
}

#[test]
fn serde_uses_wire_names() {
    let json = serde_json::to_string(&EventType::L3ApprovalRequest).unwrap();
    assert_eq!(json, "\"L3_APPROVAL_REQUEST\"");
    let back: QuarantineTrack = serde_json::from_str("\"MANIPULATION\"").unwrap();
    assert_eq!(back, QuarantineTrack::Manipulation);
}

// ── MDL-02: grade ordering and escalation ──

#[test]
fn grades_are_ordered_and_escalation_saturates() {
    assert!(RiskGrade::L1 < RiskGrade::L2);
    assert!(RiskGrade::L2 < RiskGrade::L3);
    assert_eq!(RiskGrade::L1.escalate(), RiskGrade::L2);
    assert_eq!(RiskGrade::L2.escalate(), RiskGrade::L3);
    assert_eq!(RiskGrade::L3.escalate(), RiskGrade::L3);
    assert_eq!(RiskGrade::L3.risk_context(), RiskContext::HighRisk);
    assert_eq!(RiskGrade::L2.risk_context(), RiskContext::LowRisk);
}

#[test]
fn tier_base_credibility() {
    assert_eq!(SourceTier::T1.base_credibility(), 100.0);
    assert_eq!(SourceTier::T4.base_credibility(), 45.0);
    assert!(SourceTier::T1 < SourceTier::T4);
}

// ── MDL-03: findings ──

#[test]
fn finding_builders_set_severity() {
    let f = Finding::critical(FindingCategory::Secret, "key").at_line(3);
    assert!(f.is_critical());
    assert_eq!(f.line, Some(3));
    assert!(!Finding::advisory(FindingCategory::Pii, "email").is_critical());
}

// ── MDL-04: quarantine window ──

#[test]
fn quarantine_in_force_only_while_active_and_unexpired() {
    let now = Utc::now();
    let mut record = QuarantineRecord {
        id: 1,
        agent_id: "did:warden:a".to_string(),
        reason: "spoofed citation".to_string(),
        track: QuarantineTrack::Manipulation,
        started_at: now,
        ends_at: now + Duration::hours(48),
        status: QuarantineStatus::Active,
    };
    assert!(record.is_in_force(now));
    assert!(!record.is_in_force(now + Duration::hours(49)));
    record.status = QuarantineStatus::Lifted;
    assert!(!record.is_in_force(now));
}

// ── MDL-05: error taxonomy ──

#[test]
fn only_integrity_errors_are_fatal() {
    let integrity: WardenError = LedgerError::IntegrityViolation {
        entry_id: 7,
        details: "hash mismatch".to_string(),
    }
    .into();
    assert!(integrity.is_fatal());
    assert_eq!(integrity.error_code(), "INTEGRITY_VIOLATION");

    let policy: WardenError = PolicyError::SourceRejected {
        url: "https://example.invalid".to_string(),
        sci: 25.0,
        threshold: 35.0,
        grade: RiskGrade::L2,
    }
    .into();
    assert!(!policy.is_fatal());
    assert_eq!(policy.error_code(), "SOURCE_REJECTED");
    assert_eq!(policy.risk_grade(), Some(RiskGrade::L2));

    let input: WardenError = TrustError::AgentNotFound("ghost".to_string()).into();
    assert!(!input.is_fatal());
    assert_eq!(input.reason_string(), "[AGENT_NOT_FOUND] trust error: agent not found: ghost");
}
