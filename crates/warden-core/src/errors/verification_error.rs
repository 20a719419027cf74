use super::error_code::{self, WardenErrorCode};

/// Errors from the verification pipeline.
///
/// Only `MalformedArtifact` is surfaced to callers. The rest are collected as
/// non-fatal stage errors and turned into skipped stages or advisory findings.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("malformed artifact: {0}")]
    MalformedArtifact(String),

    #[error("{stage} stage could not parse the artifact: {message}")]
    ParseFailed { stage: String, message: String },

    #[error("external verifier {verifier} unavailable: {reason}")]
    VerifierUnavailable { verifier: String, reason: String },

    #[error("external verifier {verifier} timed out after {timeout_ms}ms")]
    VerifierTimeout { verifier: String, timeout_ms: u64 },
}

impl WardenErrorCode for VerificationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedArtifact(_) => error_code::MALFORMED_ARTIFACT,
            Self::ParseFailed { .. } => error_code::PARSE_FAILED,
            Self::VerifierUnavailable { .. } => error_code::VERIFIER_UNAVAILABLE,
            Self::VerifierTimeout { .. } => error_code::VERIFIER_TIMEOUT,
        }
    }
}
