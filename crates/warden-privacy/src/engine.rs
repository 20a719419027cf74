use warden_core::constants::REDACTED_PLACEHOLDER;
use warden_core::errors::WardenResult;
use warden_core::traits::{ISanitizer, Redaction, SanitizedText};

use crate::patterns::{self, PatternMatch};

/// Privacy engine: finds hardcoded secrets and redacts PII.
///
/// Implements `ISanitizer` from warden-core. Sanitization is idempotent:
/// the placeholder matches no pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivacyEngine;

impl PrivacyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Every secret/credential hit, in source order.
    pub fn detect_secrets(&self, text: &str) -> Vec<PatternMatch> {
        let mut hits = patterns::scan(text, "secret", &patterns::secrets::all_patterns());
        hits.reverse();
        hits
    }

    /// First secret hit, if any. A single hit is enough to fail an artifact.
    pub fn first_secret(&self, text: &str) -> Option<PatternMatch> {
        self.detect_secrets(text).into_iter().next()
    }

    /// Every PII hit, in source order.
    pub fn detect_pii(&self, text: &str) -> Vec<PatternMatch> {
        let mut hits = patterns::scan(text, "pii", &patterns::pii::all_patterns());
        hits.reverse();
        hits
    }

    /// Names of patterns whose regex failed to compile.
    pub fn failed_patterns(&self) -> Vec<&'static str> {
        patterns::secrets::all_patterns()
            .into_iter()
            .chain(patterns::pii::all_patterns())
            .filter(|p| p.regex.is_none())
            .map(|p| p.name)
            .collect()
    }
}

impl ISanitizer for PrivacyEngine {
    fn sanitize(&self, text: &str) -> WardenResult<SanitizedText> {
        // Descending by start, so each replacement leaves earlier offsets valid.
        let matches = patterns::scan(text, "pii", &patterns::pii::all_patterns());

        let mut sanitized = text.to_string();
        for m in &matches {
            sanitized.replace_range(m.start..m.end, REDACTED_PLACEHOLDER);
        }

        let redactions = matches
            .iter()
            .rev()
            .map(|m| Redaction {
                category: format!("{}:{}", m.category, m.name),
                placeholder: REDACTED_PLACEHOLDER.to_string(),
                start: m.start,
                end: m.end,
            })
            .collect();

        Ok(SanitizedText {
            text: sanitized,
            redactions,
        })
    }
}
