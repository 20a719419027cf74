//! Degradation tracker and tracing setup tests.

use chrono::Utc;

use warden_core::config::ObservabilityConfig;
use warden_observability::{
    events, init_tracing, DegradationEvent, DegradationTracker, RecoveryStatus,
};

// ── OB-01: degradation tracking ──

#[test]
fn one_success_recovers_every_open_fallback_of_a_component() {
    let started = Utc::now();
    let mut tracker = DegradationTracker::new();
    tracker.record(DegradationEvent::now("verifier:cbmc", "UNAVAILABLE", "heuristic_scan"));
    tracker.record(DegradationEvent::now("verifier:cbmc", "TIMEOUT", "heuristic_scan"));
    tracker.record(DegradationEvent::now("verifier:z3", "TIMEOUT", "heuristic_scan"));

    assert!(tracker.is_degraded("verifier:cbmc"));
    assert_eq!(tracker.active().len(), 3);
    assert_eq!(tracker.failures_since("verifier:cbmc", started), 2);

    assert_eq!(tracker.recover("verifier:cbmc"), 2);
    assert_eq!(tracker.recover("verifier:cbmc"), 0);
    assert!(!tracker.is_degraded("verifier:cbmc"));
    assert!(tracker.is_degraded("verifier:z3"));

    let history = tracker.history();
    assert_eq!(history[0].recovery_status, RecoveryStatus::Recovered);
    assert!(history[0].recovered_at.is_some());
    assert_eq!(history[2].recovery_status, RecoveryStatus::Active);
}

#[test]
fn full_history_evicts_recovered_events_first() {
    let mut tracker = DegradationTracker::with_capacity(2);
    tracker.record(DegradationEvent::now("verifier:z3", "ERROR", "heuristic_scan"));
    tracker.record(DegradationEvent::now("sentinel", "pipeline marked unavailable", "review"));
    tracker.recover("sentinel");
    tracker.record(DegradationEvent::now("verifier:cbmc", "TIMEOUT", "heuristic_scan"));

    let components: Vec<_> = tracker
        .history()
        .into_iter()
        .map(|t| t.event.component)
        .collect();
    assert_eq!(components, vec!["verifier:z3", "verifier:cbmc"]);
}

#[test]
fn tracked_degradation_serializes_lowercase_status() {
    let mut tracker = DegradationTracker::new();
    tracker.record(DegradationEvent::now("verifier", "ERROR", "heuristic_scan"));
    let json = serde_json::to_value(&tracker.history()[0]).unwrap();
    assert_eq!(json["recovery_status"], "active");
    assert_eq!(json["event"]["failure_mode"], "ERROR");
}

// ── OB-02: tracing setup ──

#[test]
fn init_tracing_is_idempotent() {
    let config = ObservabilityConfig::default();
    init_tracing(&config);
    init_tracing(&config);
    events::chain_verified(3, true);
    events::mode_changed("NORMAL", "LEAN", "budget");
}
