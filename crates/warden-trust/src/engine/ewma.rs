use warden_core::config::TrustConfig;
use warden_core::errors::TrustError;
use warden_core::models::RiskContext;

use super::check_unit;

/// Smoothing factor for a context. High-risk work uses the lower λ so
/// failures there move the score faster.
pub fn lambda_for(context: RiskContext, config: &TrustConfig) -> f64 {
    match context {
        RiskContext::HighRisk => config.lambda_high_risk,
        RiskContext::LowRisk => config.lambda_low_risk,
    }
}

/// `new = λ·old + (1 − λ)·outcome`.
///
/// ```
/// use warden_core::config::TrustConfig;
/// use warden_core::models::RiskContext;
/// use warden_trust::ewma_update;
///
/// let config = TrustConfig::default();
/// let next = ewma_update(0.5, 1.0, RiskContext::HighRisk, &config).unwrap();
/// assert!((next - 0.53).abs() < 1e-9);
/// assert!(ewma_update(1.2, 1.0, RiskContext::LowRisk, &config).is_err());
/// ```
pub fn ewma_update(
    old: f64,
    outcome: f64,
    context: RiskContext,
    config: &TrustConfig,
) -> Result<f64, TrustError> {
    let old = check_unit("score", old)?;
    let outcome = check_unit("outcome", outcome)?;
    let lambda = lambda_for(context, config);
    Ok((lambda * old + (1.0 - lambda) * outcome).clamp(0.0, 1.0))
}
