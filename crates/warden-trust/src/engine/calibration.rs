use warden_core::config::TrustConfig;
use warden_core::errors::TrustError;
use warden_core::models::CalibrationStatus;

use super::check_unit;

/// Squared error of one prediction: `(confidence − outcome)²`.
///
/// ```
/// use warden_trust::brier_contribution;
///
/// assert!((brier_contribution(0.9, false).unwrap() - 0.81).abs() < 1e-12);
/// assert_eq!(brier_contribution(1.0, true).unwrap(), 0.0);
/// assert!(brier_contribution(-0.1, true).is_err());
/// ```
pub fn brier_contribution(confidence: f64, correct: bool) -> Result<f64, TrustError> {
    let confidence = check_unit("confidence", confidence)?;
    let outcome = if correct { 1.0 } else { 0.0 };
    Ok((confidence - outcome).powi(2))
}

/// Mean of the contributions in the window. None for an empty window.
pub fn brier_score(contributions: &[f64]) -> Option<f64> {
    if contributions.is_empty() {
        return None;
    }
    Some(contributions.iter().sum::<f64>() / contributions.len() as f64)
}

/// OVERCONFIDENT once the rolling score is strictly above the honest-error
/// threshold.
pub fn calibration_status(brier: Option<f64>, config: &TrustConfig) -> CalibrationStatus {
    match brier {
        Some(b) if b > config.honest_error_brier => CalibrationStatus::Overconfident,
        _ => CalibrationStatus::Ok,
    }
}
