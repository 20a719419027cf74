//! Mode enforcer tests: the gate per mode, sampling, counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use warden_core::config::ModeConfig;
use warden_core::models::{OperatingMode, RiskGrade};
use warden_core::traits::ISampler;
use warden_mode::{FixedSampler, ModeEnforcer, RandomSampler};

fn gate(mode: OperatingMode, draw: f64) -> ModeEnforcer {
    ModeEnforcer::new(mode, Arc::new(FixedSampler(draw)), ModeConfig::default())
}

/// Cycles through 0.00, 0.01, ... 0.99.
struct StepSampler(AtomicUsize);

impl ISampler for StepSampler {
    fn sample(&self) -> f64 {
        (self.0.fetch_add(1, Ordering::Relaxed) % 100) as f64 / 100.0
    }
}

// ── MD-01: gate table ──

#[test]
fn each_mode_gates_grades_as_documented() {
    let expected = [
        (OperatingMode::Normal, [true, true, true]),
        (OperatingMode::Surge, [false, true, true]),
        (OperatingMode::Safe, [false, false, true]),
    ];
    for (mode, verdicts) in expected {
        let g = gate(mode, 0.99);
        for (grade, verify) in RiskGrade::ALL.iter().zip(verdicts) {
            assert_eq!(g.should_verify(*grade).verify, verify, "{mode} {grade}");
        }
    }
}

#[test]
fn lean_samples_only_l1() {
    let inside = gate(OperatingMode::Lean, 0.05);
    let decision = inside.should_verify(RiskGrade::L1);
    assert!(decision.verify);
    assert!(decision.reason.starts_with("LEAN sampled L1"));

    let outside = gate(OperatingMode::Lean, 0.10);
    let decision = outside.should_verify(RiskGrade::L1);
    assert!(!decision.verify);
    assert_eq!(decision.reason, "LEAN skipped L1 outside the 10% sample");
    assert!(outside.should_verify(RiskGrade::L2).verify);
}

#[test]
fn lean_verifies_the_configured_fraction() {
    let g = ModeEnforcer::new(
        OperatingMode::Lean,
        Arc::new(StepSampler(AtomicUsize::new(0))),
        ModeConfig::default(),
    );
    for _ in 0..1_000 {
        g.should_verify(RiskGrade::L1);
    }
    let stats = g.mode_stats();
    assert_eq!(stats.l1.verified, 100);
    assert_eq!(stats.l1.skipped, 900);
}

proptest! {
    #[test]
    fn prop_l3_is_never_skipped(mode_idx in 0usize..4, draw in 0.0f64..1.0) {
        let g = gate(OperatingMode::ALL[mode_idx], draw);
        prop_assert!(g.should_verify(RiskGrade::L3).verify);
    }
}

// ── MD-02: mode changes and counters ──

#[test]
fn set_mode_returns_previous_and_keeps_counters() {
    let g = gate(OperatingMode::Normal, 0.5);
    g.should_verify(RiskGrade::L1);
    assert_eq!(g.set_mode(OperatingMode::Safe), OperatingMode::Normal);
    assert_eq!(g.mode(), OperatingMode::Safe);
    g.should_verify(RiskGrade::L1);
    g.should_verify(RiskGrade::L3);

    let stats = g.mode_stats();
    assert_eq!(stats.mode, OperatingMode::Safe);
    assert_eq!(stats.l1.verified, 1);
    assert_eq!(stats.l1.skipped, 1);
    assert_eq!(stats.for_grade(RiskGrade::L3).verified, 1);
    assert_eq!(stats.total_skipped(), 1);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["mode"], "SAFE");

    g.reset_stats();
    assert_eq!(g.mode_stats().total_skipped(), 0);
}

#[test]
fn from_config_starts_in_initial_mode() {
    let config = ModeConfig {
        initial_mode: OperatingMode::Surge,
        ..ModeConfig::default()
    };
    let g = ModeEnforcer::from_config(config);
    assert_eq!(g.mode(), OperatingMode::Surge);
    let draw = RandomSampler.sample();
    assert!((0.0..1.0).contains(&draw));
}
