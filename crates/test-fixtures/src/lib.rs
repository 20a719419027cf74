//! Test fixture loader for artifact corpora and source lists shared by the
//! verification, privacy and governance integration tests.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// This crate's own directory, fixed at compile time so every dependent
/// test resolves the same corpus.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// One artifact with the audit outcome it is expected to produce.
///
/// Grades, verdicts and categories are wire strings so this crate stays
/// independent of the governance types.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactCase {
    pub name: String,
    pub path: String,
    pub content: String,
    pub expected_grade: String,
    pub expected_verdict: String,
    /// Finding categories that must be present.
    #[serde(default)]
    pub expected_categories: Vec<String>,
    #[serde(default)]
    pub expect_pii_redacted: bool,
}

/// A URL with the tier it must classify to.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCase {
    pub url: String,
    pub tier: String,
}

/// The audit corpus under `artifacts/sentinel_cases.json`.
pub fn artifact_cases() -> Vec<ArtifactCase> {
    load_fixture("artifacts/sentinel_cases.json")
}

/// The tier-classification corpus under `artifacts/source_tiers.json`.
pub fn source_cases() -> Vec<SourceCase> {
    load_fixture("artifacts/source_tiers.json")
}
