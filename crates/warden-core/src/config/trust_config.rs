//! Configuration for trust dynamics.
//!
//! # Examples
//!
//! ```
//! use warden_core::config::TrustConfig;
//!
//! let config = TrustConfig::default();
//! assert!((config.lambda_high_risk - 0.94).abs() < f64::EPSILON);
//! assert_eq!(config.max_hops, 3);
//! ```

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::MicroPenaltyKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Initial trust score for newly registered agents. Default: 0.4.
    pub bootstrap_score: f64,
    /// EWMA smoothing under HIGH_RISK context. Default: 0.94.
    pub lambda_high_risk: f64,
    /// EWMA smoothing under LOW_RISK context. Default: 0.97.
    pub lambda_low_risk: f64,
    /// Scores above this are KBT. Default: 0.5.
    pub kbt_threshold: f64,
    /// Scores above this are IBT. Default: 0.8.
    pub ibt_threshold: f64,
    /// Fixed drop when a violation cannot demote a stage. Default: 0.1.
    pub violation_drop: f64,
    /// Inactive agents drift toward this score. Default: 0.4.
    pub neutral_baseline: f64,
    /// Drift applied per decay period. Default: 0.01.
    pub decay_rate: f64,
    /// Length of one decay period in days. Default: 30.
    pub decay_period_days: f64,
    /// Decay changes smaller than this are not persisted. Default: 0.0001.
    pub min_decay_change: f64,
    /// Deduction for a schema violation. Default: 0.005.
    pub penalty_schema_violation: f64,
    /// Deduction for API misuse. Default: 0.005.
    pub penalty_api_misuse: f64,
    /// Deduction for a stale citation. Default: 0.010.
    pub penalty_stale_citation: f64,
    /// Maximum total micro-penalty per agent per day. Default: 0.020.
    pub daily_penalty_cap: f64,
    /// Score floor while on probation. Default: 0.35.
    pub probation_floor: f64,
    /// Probation ends after this many verifications. Default: 5.
    pub probation_min_verifications: u32,
    /// Probation ends this many days after registration. Default: 30.
    pub probation_days: i64,
    /// Attenuation per hop after the first. Default: 0.5.
    pub transitive_damping: f64,
    /// Paths longer than this carry no trust. Default: 3.
    pub max_hops: usize,
    /// Weight of computed influence versus the anchor distribution. Default: 0.85.
    pub anchor_damping: f64,
    /// Roles that receive anchor weight (case-insensitive). Default: judge, overseer, sentinel.
    pub anchor_roles: Vec<String>,
    /// Cooling-off after an honest error. Default: 24.
    pub cooling_off_honest_hours: i64,
    /// Cooling-off after manipulation. Default: 48.
    pub cooling_off_malicious_hours: i64,
    /// Deduction when an agent's confidence stops matching its record. Default: 0.010.
    pub penalty_miscalibration: f64,
    /// Predictions in the rolling Brier window. Default: 100.
    pub calibration_window: usize,
    /// Rolling Brier score above this puts the agent on the honest-error track. Default: 0.2.
    pub honest_error_brier: f64,
}

impl TrustConfig {
    /// Deduction configured for a micro-penalty class.
    pub fn micro_penalty(&self, kind: MicroPenaltyKind) -> f64 {
        match kind {
            MicroPenaltyKind::SchemaViolation => self.penalty_schema_violation,
            MicroPenaltyKind::ApiMisuse => self.penalty_api_misuse,
            MicroPenaltyKind::StaleCitation => self.penalty_stale_citation,
            MicroPenaltyKind::Miscalibration => self.penalty_miscalibration,
        }
    }

    pub fn is_anchor_role(&self, role: &str) -> bool {
        self.anchor_roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            bootstrap_score: defaults::DEFAULT_BOOTSTRAP_SCORE,
            lambda_high_risk: defaults::DEFAULT_LAMBDA_HIGH_RISK,
            lambda_low_risk: defaults::DEFAULT_LAMBDA_LOW_RISK,
            kbt_threshold: defaults::DEFAULT_KBT_THRESHOLD,
            ibt_threshold: defaults::DEFAULT_IBT_THRESHOLD,
            violation_drop: defaults::DEFAULT_VIOLATION_DROP,
            neutral_baseline: defaults::DEFAULT_NEUTRAL_BASELINE,
            decay_rate: defaults::DEFAULT_DECAY_RATE,
            decay_period_days: defaults::DEFAULT_DECAY_PERIOD_DAYS,
            min_decay_change: defaults::DEFAULT_MIN_DECAY_CHANGE,
            penalty_schema_violation: defaults::DEFAULT_PENALTY_SCHEMA_VIOLATION,
            penalty_api_misuse: defaults::DEFAULT_PENALTY_API_MISUSE,
            penalty_stale_citation: defaults::DEFAULT_PENALTY_STALE_CITATION,
            daily_penalty_cap: defaults::DEFAULT_DAILY_PENALTY_CAP,
            probation_floor: defaults::DEFAULT_PROBATION_FLOOR,
            probation_min_verifications: defaults::DEFAULT_PROBATION_MIN_VERIFICATIONS,
            probation_days: defaults::DEFAULT_PROBATION_DAYS,
            transitive_damping: defaults::DEFAULT_TRANSITIVE_DAMPING,
            max_hops: defaults::DEFAULT_MAX_HOPS,
            anchor_damping: defaults::DEFAULT_ANCHOR_DAMPING,
            anchor_roles: defaults::DEFAULT_ANCHOR_ROLES
                .iter()
                .map(|r| r.to_string())
                .collect(),
            cooling_off_honest_hours: defaults::DEFAULT_COOLING_OFF_HONEST_HOURS,
            cooling_off_malicious_hours: defaults::DEFAULT_COOLING_OFF_MALICIOUS_HOURS,
            penalty_miscalibration: defaults::DEFAULT_PENALTY_MISCALIBRATION,
            calibration_window: defaults::DEFAULT_CALIBRATION_WINDOW,
            honest_error_brier: defaults::DEFAULT_HONEST_ERROR_BRIER,
        }
    }
}
