//! Top-level Warden configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    ApprovalConfig, CredibilityConfig, LedgerConfig, ModeConfig, ObservabilityConfig, QuarantineConfig,
    StorageConfig, TrustConfig, VerificationConfig,
};
use crate::errors::ConfigError;
use crate::models::OperatingMode;

/// Project config filename looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "warden.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `CliOverrides`)
/// 2. Environment variables (`WARDEN_*`)
/// 3. Project config (`warden.toml` in project root)
/// 4. User config (`~/.warden/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WardenConfig {
    pub storage: StorageConfig,
    pub ledger: LedgerConfig,
    pub verification: VerificationConfig,
    pub trust: TrustConfig,
    pub credibility: CredibilityConfig,
    pub quarantine: QuarantineConfig,
    pub approval: ApprovalConfig,
    pub mode: ModeConfig,
    pub observability: ObservabilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub workspace_id: Option<String>,
    pub db_filename: Option<String>,
    pub mode: Option<OperatingMode>,
    pub verifier_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl WardenConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();

        // Layer 4 (lowest file priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                merge_tables(&mut merged, read_table(&user_config_path)?);
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            merge_tables(&mut merged, read_table(&project_config_path)?);
        }

        let mut config: WardenConfig =
            toml::Value::Table(merged)
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::ParseError {
                    path: project_config_path.display().to_string(),
                    message: e.to_string(),
                })?;

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: WardenConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.trust;
        for (field, value) in [
            ("trust.bootstrap_score", t.bootstrap_score),
            ("trust.neutral_baseline", t.neutral_baseline),
            ("trust.probation_floor", t.probation_floor),
            ("trust.kbt_threshold", t.kbt_threshold),
            ("trust.ibt_threshold", t.ibt_threshold),
            ("trust.transitive_damping", t.transitive_damping),
            ("trust.anchor_damping", t.anchor_damping),
            ("trust.honest_error_brier", t.honest_error_brier),
            ("mode.lean_sample_rate", self.mode.lean_sample_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        for (field, value) in [
            ("trust.lambda_high_risk", t.lambda_high_risk),
            ("trust.lambda_low_risk", t.lambda_low_risk),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(invalid(field, "must be strictly between 0.0 and 1.0"));
            }
        }
        if t.kbt_threshold >= t.ibt_threshold {
            return Err(invalid(
                "trust.kbt_threshold",
                "must be lower than trust.ibt_threshold",
            ));
        }
        if t.decay_period_days <= 0.0 {
            return Err(invalid("trust.decay_period_days", "must be greater than 0"));
        }
        if t.calibration_window == 0 {
            return Err(invalid("trust.calibration_window", "must be greater than 0"));
        }
        if self.approval.sla_hours <= 0 {
            return Err(invalid("approval.sla_hours", "must be greater than 0"));
        }
        let c = &self.credibility;
        if c.l2_to_l3_threshold >= c.l1_to_l2_threshold {
            return Err(invalid(
                "credibility.l2_to_l3_threshold",
                "must be lower than credibility.l1_to_l2_threshold",
            ));
        }
        if self.verification.verifier_timeout_ms == 0 {
            return Err(invalid(
                "verification.verifier_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.verification.complexity_advisory_threshold
            > self.verification.complexity_critical_threshold
        {
            return Err(invalid(
                "verification.complexity_advisory_threshold",
                "must not exceed verification.complexity_critical_threshold",
            ));
        }
        if self.storage.workspace_id.trim().is_empty() {
            return Err(invalid("storage.workspace_id", "must not be empty"));
        }
        Ok(())
    }

    /// Absolute database path for a project rooted at `root`.
    pub fn db_path(&self, root: &Path) -> PathBuf {
        root.join(&self.storage.db_filename)
    }

    /// Returns the user config path: `~/.warden/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".warden").join("config.toml"))
    }

    /// Apply environment variable overrides.
    /// Pattern: `WARDEN_WORKSPACE_ID`, `WARDEN_MODE`, etc. Unparseable values are ignored.
    fn apply_env_overrides(config: &mut WardenConfig) {
        if let Ok(val) = std::env::var("WARDEN_WORKSPACE_ID") {
            config.storage.workspace_id = val;
        }
        if let Ok(val) = std::env::var("WARDEN_DB_FILENAME") {
            config.storage.db_filename = val;
        }
        if let Ok(val) = std::env::var("WARDEN_MODE") {
            if let Some(mode) = OperatingMode::from_str_name(&val.to_ascii_uppercase()) {
                config.mode.initial_mode = mode;
            }
        }
        if let Ok(val) = std::env::var("WARDEN_LEAN_SAMPLE_RATE") {
            if let Ok(v) = val.parse::<f64>() {
                config.mode.lean_sample_rate = v;
            }
        }
        if let Ok(val) = std::env::var("WARDEN_VERIFIER_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.verification.verifier_timeout_ms = v;
            }
        }
        if let Ok(val) = std::env::var("WARDEN_LAMBDA_HIGH_RISK") {
            if let Ok(v) = val.parse::<f64>() {
                config.trust.lambda_high_risk = v;
            }
        }
        if let Ok(val) = std::env::var("WARDEN_LAMBDA_LOW_RISK") {
            if let Ok(v) = val.parse::<f64>() {
                config.trust.lambda_low_risk = v;
            }
        }
        if let Ok(val) = std::env::var("WARDEN_SCI_REJECT_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.credibility.reject_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("WARDEN_LOG_LEVEL") {
            config.observability.log_level = val;
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut WardenConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.workspace_id {
            config.storage.workspace_id = v.clone();
        }
        if let Some(ref v) = cli.db_filename {
            config.storage.db_filename = v.clone();
        }
        if let Some(v) = cli.mode {
            config.mode.initial_mode = v;
        }
        if let Some(v) = cli.verifier_timeout_ms {
            config.verification.verifier_timeout_ms = v;
        }
        if let Some(ref v) = cli.log_level {
            config.observability.log_level = v.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.display().to_string(),
    })?;
    content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Deep-merge `overlay` into `base`. Nested tables merge key by key;
/// any other value in `overlay` replaces the one in `base`.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
