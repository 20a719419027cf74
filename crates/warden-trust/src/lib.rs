//! # warden-trust
//!
//! Agent trust dynamics. [`engine`] holds the pure scoring functions; the
//! [`TrustManager`] persists their results, one agent at a time, alongside
//! a history row and a ledger entry.

pub mod engine;
pub mod manager;

pub use engine::{
    anchor_damp, apply_probation_floor, brier_contribution, brier_score, calibration_status,
    cooling_off_hours, ewma_update, in_probation, lambda_for, micro_penalty, normalize_l1,
    stage_for, temporal_decay, transitive_trust, violation_penalty,
};
pub use manager::{
    NormalizationReport, PredictionOutcome, TrustManager, TrustSnapshot, ViolationOutcome,
};
