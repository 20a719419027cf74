//! Network-level trust: transitive paths and influence normalization.

use warden_core::config::TrustConfig;
use warden_core::errors::TrustError;

/// Trust along a chain of direct scores, attenuated by `transitive_damping`
/// at every hop after the first. Zero for an empty path or one longer than
/// `max_hops`.
///
/// ```
/// use warden_core::config::TrustConfig;
/// use warden_trust::transitive_trust;
///
/// let config = TrustConfig::default();
/// assert!((transitive_trust(&[0.9, 0.9], &config) - 0.405).abs() < 1e-12);
/// assert_eq!(transitive_trust(&[0.9; 4], &config), 0.0);
/// ```
pub fn transitive_trust(path: &[f64], config: &TrustConfig) -> f64 {
    let Some((first, rest)) = path.split_first() else {
        return 0.0;
    };
    if path.len() > config.max_hops {
        return 0.0;
    }
    rest.iter()
        .fold(first.clamp(0.0, 1.0), |trust, next| {
            trust * next.clamp(0.0, 1.0) * config.transitive_damping
        })
}

/// Scale to sum 1. An all-zero vector becomes uniform.
pub fn normalize_l1(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let total: f64 = scores.iter().map(|s| s.abs()).sum();
    if total <= f64::EPSILON {
        let uniform = 1.0 / scores.len() as f64;
        return vec![uniform; scores.len()];
    }
    scores.iter().map(|s| s.abs() / total).collect()
}

/// `d·current + (1 − d)·anchor`, element-wise.
pub fn anchor_damp(current: &[f64], anchor: &[f64], damping: f64) -> Result<Vec<f64>, TrustError> {
    if current.len() != anchor.len() {
        return Err(TrustError::LengthMismatch {
            left: current.len(),
            right: anchor.len(),
        });
    }
    Ok(current
        .iter()
        .zip(anchor)
        .map(|(c, a)| damping * c + (1.0 - damping) * a)
        .collect())
}
