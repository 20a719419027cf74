//! Tests for the Warden configuration system.

use std::sync::Mutex;

use warden_core::config::{CliOverrides, WardenConfig};
use warden_core::errors::{ConfigError, WardenErrorCode};
use warden_core::models::OperatingMode;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all WARDEN_ env vars to prevent cross-test contamination.
fn clear_warden_env_vars() {
    for key in [
        "WARDEN_WORKSPACE_ID",
        "WARDEN_DB_FILENAME",
        "WARDEN_MODE",
        "WARDEN_LEAN_SAMPLE_RATE",
        "WARDEN_VERIFIER_TIMEOUT_MS",
        "WARDEN_LAMBDA_HIGH_RISK",
        "WARDEN_LAMBDA_LOW_RISK",
        "WARDEN_SCI_REJECT_THRESHOLD",
        "WARDEN_LOG_LEVEL",
    ] {
        std::env::remove_var(key);
    }
}

// ── CFG-01: layered resolution (CLI > env > project > defaults) ──

#[test]
fn layered_resolution_prefers_cli_then_env_then_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_warden_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("warden.toml"),
        r#"
[storage]
workspace_id = "from-project"

[mode]
initial_mode = "LEAN"
lean_sample_rate = 0.25

[verification]
verifier_timeout_ms = 1000
"#,
    )
    .unwrap();

    std::env::set_var("WARDEN_VERIFIER_TIMEOUT_MS", "2000");
    std::env::set_var("WARDEN_WORKSPACE_ID", "from-env");

    let cli = CliOverrides {
        workspace_id: Some("from-cli".to_string()),
        ..Default::default()
    };

    let config = WardenConfig::load(dir.path(), Some(&cli)).unwrap();

    assert_eq!(config.storage.workspace_id, "from-cli");
    assert_eq!(config.verification.verifier_timeout_ms, 2000);
    assert_eq!(config.mode.initial_mode, OperatingMode::Lean);
    assert!((config.mode.lean_sample_rate - 0.25).abs() < f64::EPSILON);
    // Untouched sections keep compiled defaults.
    assert!((config.trust.lambda_high_risk - 0.94).abs() < f64::EPSILON);

    clear_warden_env_vars();
}

// ── CFG-02: missing files fall back to defaults ──

#[test]
fn missing_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_warden_env_vars();

    let dir = tempdir();
    let config = WardenConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.storage.workspace_id, "default");
    assert_eq!(config.mode.initial_mode, OperatingMode::Normal);
    assert!((config.credibility.reject_threshold - 35.0).abs() < f64::EPSILON);
    assert_eq!(config.trust.max_hops, 3);
    assert_eq!(config.db_path(dir.path()), dir.path().join("warden.db"));
}

// ── CFG-03: invalid env values are ignored ──

#[test]
fn unparseable_env_values_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_warden_env_vars();

    std::env::set_var("WARDEN_VERIFIER_TIMEOUT_MS", "soon");
    std::env::set_var("WARDEN_MODE", "turbo");

    let dir = tempdir();
    let config = WardenConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.verification.verifier_timeout_ms, 30_000);
    assert_eq!(config.mode.initial_mode, OperatingMode::Normal);

    clear_warden_env_vars();
}

// ── CFG-04: validation ──

#[test]
fn rejects_inverted_escalation_thresholds() {
    let err = WardenConfig::from_toml(
        r#"
[credibility]
l1_to_l2_threshold = 40.0
l2_to_l3_threshold = 60.0
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "credibility.l2_to_l3_threshold");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_lambda_outside_open_interval() {
    let err = WardenConfig::from_toml("[trust]\nlambda_high_risk = 1.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn rejects_zero_verifier_timeout() {
    let err = WardenConfig::from_toml("[verification]\nverifier_timeout_ms = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn rejects_sample_rate_above_one() {
    assert!(WardenConfig::from_toml("[mode]\nlean_sample_rate = 1.5\n").is_err());
}

#[test]
fn rejects_non_positive_sla_and_empty_calibration_window() {
    for (toml, expected) in [
        ("[approval]\nsla_hours = 0\n", "approval.sla_hours"),
        ("[trust]\ncalibration_window = 0\n", "trust.calibration_window"),
        ("[trust]\nhonest_error_brier = 1.5\n", "trust.honest_error_brier"),
    ] {
        match WardenConfig::from_toml(toml).unwrap_err() {
            ConfigError::ValidationFailed { field, .. } => assert_eq!(field, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[test]
fn approval_section_overrides_sla_defaults() {
    let config = WardenConfig::from_toml("[approval]\nsla_hours = 8\n").unwrap();
    assert_eq!(config.approval.sla_hours, 8);
    assert_eq!(config.approval.critical_after_hours, 12);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = WardenConfig::from_toml("[trust\nbootstrap_score = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

// ── CFG-05: round trip through TOML ──

#[test]
fn to_toml_round_trips() {
    let mut config = WardenConfig::default();
    config.trust.anchor_roles = vec!["overseer".to_string()];
    config.mode.initial_mode = OperatingMode::Safe;

    let text = config.to_toml().unwrap();
    let back = WardenConfig::from_toml(&text).unwrap();

    assert_eq!(back.trust.anchor_roles, vec!["overseer".to_string()]);
    assert_eq!(back.mode.initial_mode, OperatingMode::Safe);
}
