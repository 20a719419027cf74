use chrono::{DateTime, Utc};

use warden_core::config::TrustConfig;

/// Apply a micro-penalty of `base` against what is left of the daily cap.
/// Returns `(new_score, applied)`; `applied` is zero once the cap is spent.
///
/// ```
/// use warden_core::config::TrustConfig;
/// use warden_trust::micro_penalty;
///
/// let config = TrustConfig::default();
/// let (score, applied) = micro_penalty(0.6, 0.010, 0.015, &config);
/// assert!((applied - 0.005).abs() < 1e-12);
/// assert!((score - 0.595).abs() < 1e-12);
/// ```
pub fn micro_penalty(score: f64, base: f64, daily_sum: f64, config: &TrustConfig) -> (f64, f64) {
    let remaining = (config.daily_penalty_cap - daily_sum).max(0.0);
    let applied = base.min(remaining).max(0.0);
    ((score - applied).max(0.0), applied)
}

/// On probation until enough verifications or enough time has passed.
pub fn in_probation(
    verification_count: u32,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &TrustConfig,
) -> bool {
    verification_count < config.probation_min_verifications
        && (now - created_at).num_days() < config.probation_days
}

/// Hold a probationary agent at the floor. A score already under the floor
/// is not pushed further down.
pub fn apply_probation_floor(old: f64, new: f64, probation: bool, config: &TrustConfig) -> f64 {
    if probation && new < config.probation_floor {
        new.max(config.probation_floor.min(old))
    } else {
        new
    }
}

pub fn cooling_off_hours(is_malicious: bool, config: &TrustConfig) -> i64 {
    if is_malicious {
        config.cooling_off_malicious_hours
    } else {
        config.cooling_off_honest_hours
    }
}
