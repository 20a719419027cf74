//! GovernanceEngine: wires the subsystems into the submission flow.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument, warn};

use warden_core::config::WardenConfig;
use warden_core::constants::{JUDGE_IDENTITY, SENTINEL_IDENTITY};
use warden_core::errors::{PolicyError, WardenResult};
use warden_core::models::{
    ApprovalRequest, AuditVerdict, CredibilityAction, CredibilityCheck, EventType, Finding,
    FindingCategory, LedgerEntry, OperatingMode, RiskGrade, Verdict,
};
use warden_core::traits::ISampler;
use warden_credibility::{QuarantineManager, SourceCredibilityIndex};
use warden_ledger::{DigestSigner, Ledger};
use warden_mode::{ModeEnforcer, ModeStats, RandomSampler};
use warden_observability::events;
use warden_storage::queries::state_ops;
use warden_storage::{fmt_ts, immediate_transaction, StorageEngine};
use warden_trust::TrustManager;
use warden_verification::SentinelPipeline;

use crate::approval::{ApprovalDecision, ApprovalQueue};
use crate::sla::SlaMonitor;
use crate::submission::{Submission, SystemStatus};

/// One workspace's governance stack.
pub struct GovernanceEngine {
    storage: Arc<StorageEngine>,
    ledger: Arc<Ledger>,
    pipeline: Arc<SentinelPipeline>,
    trust: Arc<TrustManager>,
    credibility: Arc<SourceCredibilityIndex>,
    quarantine: Arc<QuarantineManager>,
    mode: ModeEnforcer,
    approvals: ApprovalQueue,
    sla: SlaMonitor,
}

impl GovernanceEngine {
    /// Open with the default pipeline (no external verifiers) and a random
    /// sampler for LEAN mode.
    pub async fn open(storage: Arc<StorageEngine>, config: WardenConfig) -> WardenResult<Self> {
        let pipeline = SentinelPipeline::new(config.verification.clone());
        Self::open_with(storage, config, pipeline, Arc::new(RandomSampler)).await
    }

    /// Open with a caller-built pipeline and sampler.
    ///
    /// The operating mode is read back from `system_state`; a fresh
    /// workspace starts in `config.mode.initial_mode`.
    pub async fn open_with(
        storage: Arc<StorageEngine>,
        config: WardenConfig,
        pipeline: SentinelPipeline,
        sampler: Arc<dyn ISampler>,
    ) -> WardenResult<Self> {
        let ledger = Arc::new(
            Ledger::open(Arc::clone(&storage), Arc::new(DigestSigner), config.ledger.clone()).await?,
        );
        let quarantine = Arc::new(QuarantineManager::new(
            Arc::clone(&storage),
            Arc::clone(&ledger),
            config.quarantine.clone(),
        ));
        let trust = Arc::new(TrustManager::new(
            Arc::clone(&storage),
            Arc::clone(&ledger),
            Arc::clone(&quarantine),
            config.trust.clone(),
        ));
        let credibility = Arc::new(SourceCredibilityIndex::new(
            Arc::clone(&storage),
            config.credibility.clone(),
        ));
        let approvals = ApprovalQueue::new(Arc::clone(&storage), Arc::clone(&ledger), Arc::clone(&trust));
        let sla = SlaMonitor::new(Arc::clone(&storage), Arc::clone(&ledger), config.approval.clone());

        let workspace_id = storage.workspace_id();
        let initial = config.mode.initial_mode;
        let now = fmt_ts(&Utc::now());
        let stored = storage
            .with_writer(|conn| {
                state_ops::ensure_state(conn, workspace_id, initial, &now)?;
                state_ops::get_state(conn, workspace_id)
            })
            .await?;
        let mode = stored.map(|s| s.mode).unwrap_or(initial);
        info!(workspace_id, mode = %mode, "governance engine opened");

        Ok(Self {
            storage,
            ledger,
            pipeline: Arc::new(pipeline),
            trust,
            credibility,
            quarantine,
            mode: ModeEnforcer::new(mode, sampler, config.mode),
            approvals,
            sla,
        })
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn pipeline(&self) -> &Arc<SentinelPipeline> {
        &self.pipeline
    }

    pub fn trust(&self) -> &Arc<TrustManager> {
        &self.trust
    }

    pub fn credibility(&self) -> &Arc<SourceCredibilityIndex> {
        &self.credibility
    }

    /// Deadlines on the L3 approval queue.
    pub fn sla(&self) -> &SlaMonitor {
        &self.sla
    }

    pub fn quarantine(&self) -> &Arc<QuarantineManager> {
        &self.quarantine
    }

    // ── Submission ──────────────────────────────────────────────────────────

    /// Run one artifact through the full governance flow.
    ///
    /// Unknown agents, quarantined agents and rejected sources fail before
    /// anything is written. A deferred artifact records only the deferral.
    #[instrument(skip(self, content, sources), fields(content_len = content.len()))]
    pub async fn submit(
        &self,
        agent_id: &str,
        path_hint: &str,
        content: &str,
        sources: &[&str],
    ) -> WardenResult<Submission> {
        self.trust.get_agent(agent_id).await?;

        if self.quarantine.is_quarantined(agent_id).await? {
            let grade = self.pipeline.classify(path_hint, content).grade;
            let until = self
                .quarantine
                .in_force(agent_id)
                .await?
                .map(|r| r.ends_at)
                .unwrap_or_else(Utc::now);
            warn!(agent_id, %until, "submission from quarantined agent denied");
            return Err(PolicyError::Quarantined {
                agent_id: agent_id.to_string(),
                until,
                grade,
            }
            .into());
        }

        let verdict = self.pipeline.audit(path_hint, content).await?;
        let (verdict, checks) = self.check_sources(path_hint, content, verdict, sources).await?;

        let decision = self.mode.should_verify(verdict.risk_grade);
        if !decision.verify {
            return self.defer(agent_id, verdict, checks, decision.reason).await;
        }

        let event_type = match verdict.verdict {
            Verdict::Pass => EventType::AuditPass,
            Verdict::Fail => EventType::AuditFail,
            Verdict::NeedsHumanReview => EventType::AuditReview,
        };
        let payload = json!({
            "agent_id": agent_id,
            "verdict": serde_json::to_value(&verdict)?,
            "sources": serde_json::to_value(&checks)?,
        });
        let (entry, queue_id) = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let entry = self.ledger.append_with_conn(
                        conn,
                        SENTINEL_IDENTITY,
                        event_type,
                        verdict.risk_grade,
                        &payload,
                    )?;
                    let queue_id = if verdict.verdict == Verdict::NeedsHumanReview {
                        Some(self.approvals.request_with_conn(
                            conn,
                            &verdict.artifact_id,
                            agent_id,
                            &verdict.rationale,
                        )?)
                    } else {
                        None
                    };
                    Ok((entry, queue_id))
                })
            })
            .await?;

        let outcome = match verdict.verdict {
            Verdict::Pass => Some(1.0),
            Verdict::Fail => Some(0.0),
            Verdict::NeedsHumanReview => None,
        };
        let trust_update = match outcome {
            Some(outcome) => Some(
                self.trust
                    .update_trust(
                        agent_id,
                        outcome,
                        verdict.risk_grade.risk_context(),
                        Some(entry.entry_id),
                    )
                    .await?,
            ),
            None => None,
        };

        Ok(Submission {
            agent_id: agent_id.to_string(),
            verdict,
            credibility: checks,
            ledger_entry_id: entry.entry_id,
            ledger_hash: entry.entry_hash,
            queue_id,
            deferred: false,
            defer_reason: None,
            trust_update,
        })
    }

    /// Check every cited source against the audited grade. Any rejection
    /// denies the submission; escalations raise the grade to the highest
    /// any source asks for and re-resolve the verdict.
    /// Weak sources raise the grade; the artifact is then audited again at
    /// the raised grade so the stages that grade requires actually run.
    async fn check_sources(
        &self,
        path_hint: &str,
        content: &str,
        verdict: AuditVerdict,
        sources: &[&str],
    ) -> WardenResult<(AuditVerdict, Vec<CredibilityCheck>)> {
        let audited = verdict.risk_grade;
        let mut checks = Vec::with_capacity(sources.len());
        for url in sources {
            let check = self.credibility.check_credibility(url, audited).await?;
            if check.action == CredibilityAction::Reject {
                warn!(url, sci = check.sci, "cited source rejected");
                return Err(PolicyError::SourceRejected {
                    url: url.to_string(),
                    sci: check.sci,
                    threshold: self.credibility.config().reject_threshold,
                    grade: audited,
                }
                .into());
            }
            checks.push(check);
        }

        let raised = checks
            .iter()
            .map(|c| c.resulting_grade)
            .max()
            .unwrap_or(audited);
        if raised <= audited {
            return Ok((verdict, checks));
        }

        info!(from = audited.as_str(), to = raised.as_str(), "re-auditing at source-escalated grade");
        let mut escalated = self
            .pipeline
            .audit_at_grade(path_hint, content, raised)
            .await?
            .verdict;
        for check in checks.iter().filter(|c| c.action == CredibilityAction::Escalate) {
            escalated.findings.push(Finding::advisory(
                FindingCategory::SourceCredibility,
                format!("{}: {}", check.url, check.reason),
            ));
        }
        Ok((escalated, checks))
    }

    async fn defer(
        &self,
        agent_id: &str,
        verdict: AuditVerdict,
        checks: Vec<CredibilityCheck>,
        reason: String,
    ) -> WardenResult<Submission> {
        let entry = self
            .ledger
            .append(
                SENTINEL_IDENTITY,
                EventType::AuditDeferred,
                verdict.risk_grade,
                &json!({
                    "agent_id": agent_id,
                    "artifact_id": verdict.artifact_id,
                    "path_hint": verdict.path_hint,
                    "mode": self.mode.mode().as_str(),
                    "reason": reason,
                }),
            )
            .await?;
        info!(agent_id, artifact_id = %verdict.artifact_id, %reason, "submission deferred");
        Ok(Submission {
            agent_id: agent_id.to_string(),
            verdict,
            credibility: checks,
            ledger_entry_id: entry.entry_id,
            ledger_hash: entry.entry_hash,
            queue_id: None,
            deferred: true,
            defer_reason: Some(reason),
            trust_update: None,
        })
    }

    // ── L3 queue ────────────────────────────────────────────────────────────

    pub async fn request_l3_approval(
        &self,
        artifact_hash: &str,
        requesting_agent: &str,
        reason: &str,
    ) -> WardenResult<ApprovalRequest> {
        self.approvals
            .request_l3_approval(artifact_hash, requesting_agent, reason)
            .await
    }

    pub async fn approve_l3(
        &self,
        queue_id: i64,
        approved: bool,
        notes: &str,
    ) -> WardenResult<ApprovalDecision> {
        self.approvals.approve_l3(queue_id, approved, notes).await
    }

    pub async fn pending_approvals(&self) -> WardenResult<Vec<ApprovalRequest>> {
        self.approvals.pending_approvals().await
    }

    // ── Mode ────────────────────────────────────────────────────────────────

    pub fn mode(&self) -> OperatingMode {
        self.mode.mode()
    }

    pub fn mode_stats(&self) -> ModeStats {
        self.mode.mode_stats()
    }

    /// Persist a mode change and record `MODE_CHANGE`. The in-memory gate
    /// switches only after the write commits.
    pub async fn set_mode(&self, mode: OperatingMode, reason: &str) -> WardenResult<LedgerEntry> {
        let workspace_id = self.storage.workspace_id();
        let previous = self.mode.mode();
        let now = fmt_ts(&Utc::now());
        let entry = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    state_ops::set_mode(conn, workspace_id, mode, reason, &now)?;
                    self.ledger.append_with_conn(
                        conn,
                        JUDGE_IDENTITY,
                        EventType::ModeChange,
                        RiskGrade::L1,
                        &json!({ "from": previous.as_str(), "to": mode.as_str(), "reason": reason }),
                    )
                })
            })
            .await?;
        self.mode.set_mode(mode);
        events::mode_changed(previous.as_str(), mode.as_str(), reason);
        Ok(entry)
    }

    pub async fn system_status(&self) -> WardenResult<SystemStatus> {
        let workspace_id = self.storage.workspace_id();
        let state = self
            .storage
            .with_reader(|conn| state_ops::get_state(conn, workspace_id))
            .await?;
        let (mode_reason, integrity_halt) = state
            .map(|s| (s.mode_reason, s.integrity_halt))
            .unwrap_or_default();
        Ok(SystemStatus {
            mode: self.mode.mode(),
            mode_reason,
            integrity_halt,
            pending_approvals: self.pending_approvals().await?.len(),
            overdue_approvals: self.sla.overdue().await?.len(),
            active_quarantines: self.quarantine.active_quarantines().await?.len(),
            ledger_entries: self.ledger.count().await?,
        })
    }
}
