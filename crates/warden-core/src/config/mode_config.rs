use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::OperatingMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Mode used when the database has no stored mode. Default: NORMAL.
    pub initial_mode: OperatingMode,
    /// Fraction of L1 artifacts verified in LEAN mode. Default: 0.10.
    pub lean_sample_rate: f64,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            initial_mode: OperatingMode::Normal,
            lean_sample_rate: defaults::DEFAULT_LEAN_SAMPLE_RATE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter used when `WARDEN_LOG` is unset. Default: "info".
    pub log_level: String,
    /// Emit JSON log lines. Default: true.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json: defaults::DEFAULT_JSON_LOGS,
        }
    }
}
