//! Hardcoded secret detection. One hit fails the artifact.

use warden_core::models::{Finding, FindingCategory};
use warden_privacy::PrivacyEngine;

/// At most one critical finding: the first secret in source order.
pub fn check(engine: &PrivacyEngine, content: &str) -> Vec<Finding> {
    engine
        .first_secret(content)
        .map(|hit| {
            Finding::critical(
                FindingCategory::Secret,
                format!("Hardcoded secret detected ({})", hit.name),
            )
            .at_line(hit.line)
        })
        .into_iter()
        .collect()
}
