//! The Sentinel pipeline: classify, check, consult verifiers, resolve.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{instrument, warn};

use warden_core::config::VerificationConfig;
use warden_core::errors::{VerificationError, WardenResult};
use warden_core::models::{AuditVerdict, Finding, FindingCategory, RiskGrade, Verdict};
use warden_core::traits::{IExternalVerifier, ISanitizer, VerifierStatus};
use warden_observability::{events, DegradationEvent, DegradationTracker, TrackedDegradation};
use warden_privacy::PrivacyEngine;

use crate::checks::{citation, complexity, dangerous_calls, heuristics, pii, quote_context, secrets};
use crate::external::{describe_failure, DispatchOutcome, VerifierDispatch};
use crate::risk::{RiskClassification, RiskClassifier};
use crate::verdict::resolve_verdict;

const SENTINEL_COMPONENT: &str = "sentinel";

/// A verdict plus the stages that could not run.
#[derive(Debug)]
pub struct AuditOutcome {
    pub verdict: AuditVerdict,
    /// Non-fatal: a failed stage is skipped, never turned into FAIL.
    pub stage_errors: Vec<VerificationError>,
}

/// Stateless verification pipeline. Safe to share across tasks.
pub struct SentinelPipeline {
    config: VerificationConfig,
    classifier: RiskClassifier,
    privacy: PrivacyEngine,
    sanitizer: Arc<dyn ISanitizer>,
    dispatch: VerifierDispatch,
    degradation: Mutex<DegradationTracker>,
    available: AtomicBool,
}

impl SentinelPipeline {
    pub fn new(config: VerificationConfig) -> Self {
        let timeout = Duration::from_millis(config.verifier_timeout_ms);
        Self {
            config,
            classifier: RiskClassifier,
            privacy: PrivacyEngine::new(),
            sanitizer: Arc::new(PrivacyEngine::new()),
            dispatch: VerifierDispatch::new(timeout),
            degradation: Mutex::new(DegradationTracker::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Register an external verifier at the lowest priority.
    pub fn with_verifier(mut self, verifier: Arc<dyn IExternalVerifier>) -> Self {
        self.dispatch.register(verifier);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn ISanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Mark the whole pipeline (un)available. While unavailable every audit
    /// is escalated one grade and routed to human review.
    pub fn set_available(&self, available: bool) {
        let was = self.available.swap(available, Ordering::SeqCst);
        if was && !available {
            self.tracker().record(DegradationEvent::now(
                SENTINEL_COMPONENT,
                "pipeline marked unavailable",
                "escalate and route to human review",
            ));
        } else if !was && available {
            self.tracker().recover(SENTINEL_COMPONENT);
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Every degradation recorded so far.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.tracker().history()
    }

    pub fn classify(&self, path_hint: &str, content: &str) -> RiskClassification {
        self.classifier.classify(path_hint, content)
    }

    /// Audit one artifact.
    ///
    /// Only a malformed artifact is an error; every stage failure degrades
    /// to a skipped stage.
    pub async fn audit(&self, path_hint: &str, content: &str) -> WardenResult<AuditVerdict> {
        Ok(self.audit_detailed(path_hint, content).await?.verdict)
    }

    /// [`audit`](Self::audit), also returning the stages that were skipped.
    pub async fn audit_detailed(&self, path_hint: &str, content: &str) -> WardenResult<AuditOutcome> {
        self.audit_at_grade(path_hint, content, RiskGrade::L1).await
    }

    /// Audit with the grade raised to at least `floor`, running every stage
    /// that grade requires. Used when something outside the artifact, such
    /// as a weak cited source, makes it riskier than its path and content.
    #[instrument(skip(self, content), fields(len = content.len()))]
    pub async fn audit_at_grade(
        &self,
        path_hint: &str,
        content: &str,
        floor: RiskGrade,
    ) -> WardenResult<AuditOutcome> {
        let started = Instant::now();
        if content.contains('\0') {
            return Err(VerificationError::MalformedArtifact(format!(
                "{path_hint}: content contains NUL bytes"
            ))
            .into());
        }

        let grade = self.classifier.classify(path_hint, content).grade.max(floor);
        if !self.is_available() {
            let verdict = self.sentinel_fallback(path_hint, content, grade, started);
            return Ok(AuditOutcome {
                verdict,
                stage_errors: Vec::new(),
            });
        }

        let mut findings = Vec::new();
        let mut stage_errors = Vec::new();

        findings.extend(secrets::check(&self.privacy, content));
        findings.extend(dangerous_calls::check(
            content,
            grade,
            self.config.dangerous_calls_critical_at_l3,
        ));

        let mut pii_redacted = false;
        match pii::check(self.sanitizer.as_ref(), content) {
            Ok((sanitized, pii_findings)) => {
                pii_redacted = sanitized.was_redacted();
                findings.extend(pii_findings);
            }
            Err(e) => {
                warn!(error = %e, "pii stage skipped");
                stage_errors.push(VerificationError::ParseFailed {
                    stage: "pii".to_string(),
                    message: e.to_string(),
                });
            }
        }

        if grade >= RiskGrade::L2 {
            match complexity::check(content, &self.config) {
                Ok(f) => findings.extend(f),
                Err(e) => {
                    warn!(error = %e, "complexity stage skipped");
                    stage_errors.push(e);
                }
            }
            findings.extend(citation::check(content, self.config.max_citation_depth));
            findings.extend(quote_context::check(content, &self.config));
        }

        let requires_approval = grade == RiskGrade::L3;
        if requires_approval {
            let outcome = self.dispatch.dispatch(content).await;
            self.record_verifier_health(&outcome, &mut stage_errors);
            findings.extend(self.formal_findings(&outcome, content));
        }

        let (verdict, rationale) = resolve_verdict(grade, &findings, requires_approval);
        let latency_ms = started.elapsed().as_millis() as u64;
        let artifact_id = artifact_id(path_hint, content);
        events::verdict_issued(&artifact_id, grade.as_str(), verdict.as_str(), latency_ms);

        Ok(AuditOutcome {
            verdict: AuditVerdict {
                artifact_id,
                path_hint: path_hint.to_string(),
                risk_grade: grade,
                verdict,
                rationale,
                findings,
                latency_ms,
                pii_redacted,
                requires_approval,
                audited_at: Utc::now(),
            },
            stage_errors,
        })
    }

    /// Claim-only audit at L2: citation depth and quote context, plus a PII
    /// pass so the verdict reports whether the claim carried personal data.
    pub fn audit_claim(&self, text: &str) -> AuditVerdict {
        let started = Instant::now();
        let mut findings = citation::check(text, self.config.max_citation_depth);
        findings.extend(quote_context::check(text, &self.config));

        let pii_redacted = match pii::check(self.sanitizer.as_ref(), text) {
            Ok((sanitized, pii_findings)) => {
                findings.extend(pii_findings);
                sanitized.was_redacted()
            }
            Err(e) => {
                warn!(error = %e, "pii stage skipped for claim");
                false
            }
        };

        let (verdict, rationale) = match resolve_verdict(RiskGrade::L2, &findings, false) {
            (Verdict::Pass, _) => (Verdict::Pass, "Claim passes citation and context rules.".to_string()),
            other => other,
        };
        let latency_ms = started.elapsed().as_millis() as u64;
        let artifact_id = artifact_id("claim", text);
        events::verdict_issued(&artifact_id, RiskGrade::L2.as_str(), verdict.as_str(), latency_ms);

        AuditVerdict {
            artifact_id,
            path_hint: "claim".to_string(),
            risk_grade: RiskGrade::L2,
            verdict,
            rationale,
            findings,
            latency_ms,
            pii_redacted,
            requires_approval: false,
            audited_at: Utc::now(),
        }
    }

    fn formal_findings(&self, outcome: &DispatchOutcome, content: &str) -> Vec<Finding> {
        match outcome.conclusive() {
            Some(attempt) if attempt.verdict.status == VerifierStatus::Fail => {
                let mut findings: Vec<Finding> = attempt
                    .verdict
                    .violations
                    .iter()
                    .map(|v| {
                        Finding::critical(
                            FindingCategory::FormalViolation,
                            format!("{}: {v}", attempt.verifier),
                        )
                    })
                    .collect();
                if findings.is_empty() {
                    findings.push(Finding::critical(
                        FindingCategory::FormalViolation,
                        format!("{}: verification failed", attempt.verifier),
                    ));
                }
                if let Some(cex) = &attempt.verdict.counterexample {
                    findings.push(Finding::advisory(
                        FindingCategory::FormalViolation,
                        format!("{} counterexample: {cex}", attempt.verifier),
                    ));
                }
                findings
            }
            Some(_) => Vec::new(),
            None => {
                let mut findings = vec![Finding::advisory(
                    FindingCategory::VerifierFallback,
                    "No external verifier returned a result; heuristic scan used",
                )];
                findings.extend(heuristics::scan(content));
                findings
            }
        }
    }

    fn record_verifier_health(
        &self,
        outcome: &DispatchOutcome,
        stage_errors: &mut Vec<VerificationError>,
    ) {
        let mut tracker = self.tracker();
        for attempt in outcome.degraded() {
            let component = format!("external_verifier:{}", attempt.verifier);
            let fallback = if outcome.conclusive().is_some() {
                "next verifier"
            } else {
                "heuristic scan"
            };
            tracker.record(DegradationEvent::now(&component, &describe_failure(attempt), fallback));
            stage_errors.push(match attempt.verdict.status {
                VerifierStatus::Timeout => VerificationError::VerifierTimeout {
                    verifier: attempt.verifier.clone(),
                    timeout_ms: self.config.verifier_timeout_ms,
                },
                _ => VerificationError::VerifierUnavailable {
                    verifier: attempt.verifier.clone(),
                    reason: describe_failure(attempt),
                },
            });
        }
        if let Some(attempt) = outcome.conclusive() {
            let component = format!("external_verifier:{}", attempt.verifier);
            tracker.recover(&component);
        }
    }

    fn sentinel_fallback(
        &self,
        path_hint: &str,
        content: &str,
        original: RiskGrade,
        started: Instant,
    ) -> AuditVerdict {
        let grade = original.escalate();
        let message = format!(
            "Sentinel unavailable; grade escalated from {original} to {grade} and routed to human review"
        );
        let latency_ms = started.elapsed().as_millis() as u64;
        let artifact_id = artifact_id(path_hint, content);
        events::verdict_issued(
            &artifact_id,
            grade.as_str(),
            Verdict::NeedsHumanReview.as_str(),
            latency_ms,
        );
        AuditVerdict {
            artifact_id,
            path_hint: path_hint.to_string(),
            risk_grade: grade,
            verdict: Verdict::NeedsHumanReview,
            rationale: message.clone(),
            findings: vec![Finding::advisory(FindingCategory::SentinelFallback, message)],
            latency_ms,
            pii_redacted: false,
            requires_approval: true,
            audited_at: Utc::now(),
        }
    }

    fn tracker(&self) -> MutexGuard<'_, DegradationTracker> {
        self.degradation.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Content address of an artifact: blake3 over the path hint and content.
pub fn artifact_id(path_hint: &str, content: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(path_hint.as_bytes());
    hasher.update(&[0]);
    hasher.update(content.as_bytes());
    hasher.finalize().to_hex().to_string()
}
