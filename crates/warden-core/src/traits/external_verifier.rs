//! Pluggable external verifiers (model checkers, solvers, similarity detectors).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Tagged result of one external verifier call.
    pub enum VerifierStatus {
        Pass => "PASS",
        Fail => "FAIL",
        Unavailable => "UNAVAILABLE",
        Timeout => "TIMEOUT",
        Error => "ERROR",
    }
}

wire_enum! {
    /// What the caller is asking the verifier to prove.
    pub enum VerificationKind {
        BoundedModelCheck => "BOUNDED_MODEL_CHECK",
        ConstraintSatisfiability => "CONSTRAINT_SATISFIABILITY",
        Similarity => "SIMILARITY",
        Consensus => "CONSENSUS",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalVerdict {
    pub status: VerifierStatus,
    pub violations: Vec<String>,
    pub counterexample: Option<String>,
}

impl ExternalVerdict {
    pub fn pass() -> Self {
        Self::with_status(VerifierStatus::Pass)
    }

    pub fn fail(violations: Vec<String>, counterexample: Option<String>) -> Self {
        Self {
            status: VerifierStatus::Fail,
            violations,
            counterexample,
        }
    }

    pub fn unavailable() -> Self {
        Self::with_status(VerifierStatus::Unavailable)
    }

    pub fn timeout() -> Self {
        Self::with_status(VerifierStatus::Timeout)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: VerifierStatus::Error,
            violations: vec![message.into()],
            counterexample: None,
        }
    }

    fn with_status(status: VerifierStatus) -> Self {
        Self {
            status,
            violations: Vec::new(),
            counterexample: None,
        }
    }

    /// The verifier produced an answer (PASS or FAIL).
    pub fn is_conclusive(&self) -> bool {
        matches!(self.status, VerifierStatus::Pass | VerifierStatus::Fail)
    }
}

/// A black-box formal verifier. Implementations must not panic; report
/// problems through `VerifierStatus::Error` or `Unavailable`.
#[async_trait]
pub trait IExternalVerifier: Send + Sync {
    /// Stable name used in findings and logs.
    fn name(&self) -> &str;

    /// The kind of check this verifier performs.
    fn kind(&self) -> VerificationKind;

    async fn verify(&self, content: &str, kind: VerificationKind) -> ExternalVerdict;
}
