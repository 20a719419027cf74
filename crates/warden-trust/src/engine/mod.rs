//! Pure trust functions. No I/O, no clocks: callers pass `now`.

pub mod calibration;
pub mod decay;
pub mod ewma;
pub mod network;
pub mod penalty;
pub mod stage;

pub use calibration::{brier_contribution, brier_score, calibration_status};
pub use decay::temporal_decay;
pub use ewma::{ewma_update, lambda_for};
pub use network::{anchor_damp, normalize_l1, transitive_trust};
pub use penalty::{apply_probation_floor, cooling_off_hours, in_probation, micro_penalty};
pub use stage::{stage_for, violation_penalty};

use warden_core::errors::TrustError;

/// Reject values outside [0, 1] (and NaN).
pub(crate) fn check_unit(field: &'static str, value: f64) -> Result<f64, TrustError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TrustError::InvalidScore { field, value })
    }
}
