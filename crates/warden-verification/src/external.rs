//! Dispatch to external formal verifiers with a per-call time bound.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use warden_core::traits::{ExternalVerdict, IExternalVerifier, VerifierStatus};

/// One verifier call and what it returned.
#[derive(Debug, Clone)]
pub struct VerifierAttempt {
    pub verifier: String,
    pub verdict: ExternalVerdict,
}

/// Every attempt made for one artifact, in priority order.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub attempts: Vec<VerifierAttempt>,
}

impl DispatchOutcome {
    /// The attempt that produced PASS or FAIL, if any did.
    pub fn conclusive(&self) -> Option<&VerifierAttempt> {
        self.attempts.iter().find(|a| a.verdict.is_conclusive())
    }

    /// Attempts that timed out, errored or were unavailable.
    pub fn degraded(&self) -> impl Iterator<Item = &VerifierAttempt> {
        self.attempts.iter().filter(|a| !a.verdict.is_conclusive())
    }
}

/// A prioritized list of external verifiers.
///
/// Verifiers are tried in registration order until one returns a conclusive
/// answer. Each call is bounded by `timeout`; a call that overruns is
/// recorded as `TIMEOUT` and the next verifier is tried.
#[derive(Clone)]
pub struct VerifierDispatch {
    verifiers: Vec<Arc<dyn IExternalVerifier>>,
    timeout: Duration,
}

impl VerifierDispatch {
    pub fn new(timeout: Duration) -> Self {
        Self {
            verifiers: Vec::new(),
            timeout,
        }
    }

    /// Append a verifier at the lowest priority.
    pub fn register(&mut self, verifier: Arc<dyn IExternalVerifier>) {
        self.verifiers.push(verifier);
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    pub async fn dispatch(&self, content: &str) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for verifier in &self.verifiers {
            let kind = verifier.kind();
            let verdict = tokio::time::timeout(self.timeout, verifier.verify(content, kind))
                .await
                .unwrap_or_else(|_| ExternalVerdict::timeout());
            debug!(
                verifier = verifier.name(),
                kind = kind.as_str(),
                status = verdict.status.as_str(),
                "external verifier returned"
            );
            let conclusive = verdict.is_conclusive();
            outcome.attempts.push(VerifierAttempt {
                verifier: verifier.name().to_string(),
                verdict,
            });
            if conclusive {
                break;
            }
        }
        outcome
    }
}

/// Short description of why an attempt gave no answer.
pub(crate) fn describe_failure(attempt: &VerifierAttempt) -> String {
    match attempt.verdict.status {
        VerifierStatus::Timeout => "timeout".to_string(),
        VerifierStatus::Unavailable => "unavailable".to_string(),
        _ => attempt
            .verdict
            .violations
            .first()
            .map(|m| format!("error: {m}"))
            .unwrap_or_else(|| "error".to_string()),
    }
}
