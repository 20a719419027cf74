//! PII redaction. Informational only.

use std::collections::BTreeSet;

use warden_core::errors::WardenResult;
use warden_core::models::{Finding, FindingCategory};
use warden_core::traits::{ISanitizer, SanitizedText};

use super::line_of;

/// Sanitize `content` and summarize what was removed as one advisory
/// finding. Never critical.
pub fn check(
    sanitizer: &dyn ISanitizer,
    content: &str,
) -> WardenResult<(SanitizedText, Vec<Finding>)> {
    let sanitized = sanitizer.sanitize(content)?;
    let Some(first) = sanitized.redactions.first() else {
        return Ok((sanitized, Vec::new()));
    };

    let kinds: BTreeSet<&str> = sanitized
        .redactions
        .iter()
        .map(|r| r.category.rsplit(':').next().unwrap_or(r.category.as_str()))
        .collect();
    let finding = Finding::advisory(
        FindingCategory::Pii,
        format!(
            "Redacted {} PII span(s): {}",
            sanitized.redactions.len(),
            kinds.into_iter().collect::<Vec<_>>().join(", ")
        ),
    )
    .at_line(line_of(content, first.start));
    Ok((sanitized, vec![finding]))
}
