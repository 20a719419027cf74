use warden_core::config::TrustConfig;
use warden_core::models::TrustStage;

/// Stage for a score. Each threshold belongs to the lower stage.
///
/// ```
/// use warden_core::config::TrustConfig;
/// use warden_core::models::TrustStage;
/// use warden_trust::stage_for;
///
/// let config = TrustConfig::default();
/// assert_eq!(stage_for(0.5, &config), TrustStage::Cbt);
/// assert_eq!(stage_for(0.8, &config), TrustStage::Kbt);
/// assert_eq!(stage_for(0.81, &config), TrustStage::Ibt);
/// ```
pub fn stage_for(score: f64, config: &TrustConfig) -> TrustStage {
    if score > config.ibt_threshold {
        TrustStage::Ibt
    } else if score > config.kbt_threshold {
        TrustStage::Kbt
    } else {
        TrustStage::Cbt
    }
}

/// Score after a violation: capped at the top of the next stage down, or a
/// fixed drop when that cap would not lower the score (always the case in CBT).
pub fn violation_penalty(score: f64, config: &TrustConfig) -> f64 {
    let fallback = (score - config.violation_drop).max(0.0);
    let target = match stage_for(score, config) {
        TrustStage::Ibt => config.ibt_threshold,
        TrustStage::Kbt => config.kbt_threshold,
        TrustStage::Cbt => return fallback,
    };
    if target < score {
        target
    } else {
        fallback
    }
}
