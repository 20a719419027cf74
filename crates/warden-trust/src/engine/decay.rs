use chrono::{DateTime, Utc};

use warden_core::config::TrustConfig;

/// Drift toward the neutral baseline for the time since `last_update`.
///
/// The drift is `decay_rate` per `decay_period_days`, prorated by day, and
/// stops at the baseline. A `last_update` in the future leaves the score as is.
pub fn temporal_decay(
    score: f64,
    last_update: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &TrustConfig,
) -> f64 {
    if last_update >= now || config.decay_period_days <= 0.0 {
        return score;
    }
    let days = (now - last_update).num_seconds() as f64 / 86_400.0;
    let drift = days / config.decay_period_days * config.decay_rate;
    let baseline = config.neutral_baseline;
    if score > baseline {
        (score - drift).max(baseline)
    } else {
        (score + drift).min(baseline)
    }
}
