use serde::{Deserialize, Serialize};

use super::defaults;

/// Source Credibility Index thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredibilityConfig {
    /// Below this SCI the citing artifact is rejected. Default: 35.
    pub reject_threshold: f64,
    /// Below this SCI an L1 artifact escalates to L2. Default: 60.
    pub l1_to_l2_threshold: f64,
    /// Below this SCI an L2 artifact escalates to L3. Must be lower than `l1_to_l2_threshold`. Default: 40.
    pub l2_to_l3_threshold: f64,
    /// SCI gained on a successful citation. Default: 2.
    pub success_delta: f64,
    /// SCI lost on a failed citation. Default: 10.
    pub failure_delta: f64,
    /// Cutoff for `low_credibility_sources`. Default: 50.
    pub low_credibility_threshold: f64,
}

impl Default for CredibilityConfig {
    fn default() -> Self {
        Self {
            reject_threshold: defaults::DEFAULT_SCI_REJECT_THRESHOLD,
            l1_to_l2_threshold: defaults::DEFAULT_SCI_L1_TO_L2_THRESHOLD,
            l2_to_l3_threshold: defaults::DEFAULT_SCI_L2_TO_L3_THRESHOLD,
            success_delta: defaults::DEFAULT_SCI_SUCCESS_DELTA,
            failure_delta: defaults::DEFAULT_SCI_FAILURE_DELTA,
            low_credibility_threshold: defaults::DEFAULT_LOW_CREDIBILITY_THRESHOLD,
        }
    }
}

/// Quarantine windows per track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarantineConfig {
    /// Default: 0 (immediate release).
    pub honest_error_hours: i64,
    /// Default: 48.
    pub manipulation_hours: i64,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            honest_error_hours: defaults::DEFAULT_HONEST_ERROR_HOURS,
            manipulation_hours: defaults::DEFAULT_MANIPULATION_HOURS,
        }
    }
}
