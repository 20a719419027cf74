use serde::{Deserialize, Serialize};

use crate::errors::WardenResult;

/// Result of sanitization with metadata about what was redacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizedText {
    pub text: String,
    pub redactions: Vec<Redaction>,
}

impl SanitizedText {
    pub fn was_redacted(&self) -> bool {
        !self.redactions.is_empty()
    }
}

/// A single redaction applied during sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redaction {
    pub category: String,
    pub placeholder: String,
    /// Byte offsets into the original text.
    pub start: usize,
    pub end: usize,
}

/// PII sanitization.
pub trait ISanitizer: Send + Sync {
    /// Replace PII with placeholders.
    fn sanitize(&self, text: &str) -> WardenResult<SanitizedText>;
}
