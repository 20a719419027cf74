//! TrustManager: the only writer of agent trust state.
//!
//! Every mutation is one `BEGIN IMMEDIATE` transaction that reads the agent,
//! applies an engine function, writes the agent row, a ledger entry and a
//! history row. A per-agent async lock keeps same-agent callers ordered
//! while different agents proceed independently.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use warden_core::config::TrustConfig;
use warden_core::constants::JUDGE_IDENTITY;
use warden_core::errors::{TrustError, WardenResult};
use warden_core::models::{
    Agent, AgentStatus, CalibrationReport, EventType, MicroPenaltyKind, QuarantineRecord,
    QuarantineTrack, RiskContext, RiskGrade, TrustStage, TrustUpdateKind, TrustUpdateRecord,
};
use warden_credibility::QuarantineManager;
use warden_ledger::Ledger;
use warden_observability::events;
use warden_storage::queries::{agent_ops, calibration_ops, trust_ops};
use warden_storage::{fmt_ts, immediate_transaction, now_ts, stored_ts, StorageEngine};

use crate::engine;

/// Read-only view of an agent's trust state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustSnapshot {
    pub agent_id: String,
    pub trust_score: f64,
    pub trust_stage: TrustStage,
    pub influence_weight: f64,
    pub verification_count: u32,
    pub status: AgentStatus,
}

impl From<&Agent> for TrustSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            agent_id: agent.agent_id.clone(),
            trust_score: agent.trust_score,
            trust_stage: agent.trust_stage,
            influence_weight: agent.influence_weight,
            verification_count: agent.verification_count,
            status: agent.status,
        }
    }
}

/// Everything a violation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationOutcome {
    pub update: TrustUpdateRecord,
    pub quarantine: QuarantineRecord,
    pub cooling_off_hours: i64,
}

/// What one recorded prediction produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub report: CalibrationReport,
    /// Set only by the prediction that moved the agent onto the
    /// honest-error track.
    pub penalty: Option<TrustUpdateRecord>,
}

/// Result of one normalization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationReport {
    pub agent_count: usize,
    pub anchor_count: usize,
    /// `(agent_id, influence_weight)` for every active agent, by id.
    pub weights: Vec<(String, f64)>,
}

pub struct TrustManager {
    storage: Arc<StorageEngine>,
    ledger: Arc<Ledger>,
    quarantine: Arc<QuarantineManager>,
    config: TrustConfig,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TrustManager {
    pub fn new(
        storage: Arc<StorageEngine>,
        ledger: Arc<Ledger>,
        quarantine: Arc<QuarantineManager>,
        config: TrustConfig,
    ) -> Self {
        Self {
            storage,
            ledger,
            quarantine,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    fn agent_lock(&self, agent_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(agent_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ── Registry ────────────────────────────────────────────────────────────

    /// Onboard an agent at the bootstrap score. Identities are global, so an
    /// id taken in any workspace is rejected.
    #[instrument(skip(self))]
    pub async fn register_agent(&self, agent_id: &str, role: &str) -> WardenResult<Agent> {
        let now = now_ts();
        let score = self.config.bootstrap_score;
        let agent = Agent {
            agent_id: agent_id.to_string(),
            workspace_id: self.storage.workspace_id().to_string(),
            role: role.to_string(),
            trust_score: score,
            trust_stage: engine::stage_for(score, &self.config),
            influence_weight: 0.0,
            verification_count: 0,
            daily_penalty_sum: 0.0,
            penalty_reset_date: now.date_naive(),
            status: AgentStatus::Active,
            created_at: now,
            last_trust_update: now,
        };
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    if agent_ops::agent_exists_anywhere(conn, agent_id)? {
                        return Err(TrustError::AgentAlreadyRegistered(agent_id.to_string()).into());
                    }
                    agent_ops::insert_agent(conn, &agent)
                })
            })
            .await?;
        info!(agent_id, role, score, "agent registered");
        Ok(agent)
    }

    pub async fn get_agent(&self, agent_id: &str) -> WardenResult<Agent> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| agent_ops::get_agent(conn, workspace_id, agent_id))
            .await?
            .ok_or_else(|| TrustError::AgentNotFound(agent_id.to_string()).into())
    }

    pub async fn get_trust(&self, agent_id: &str) -> WardenResult<TrustSnapshot> {
        Ok(TrustSnapshot::from(&self.get_agent(agent_id).await?))
    }

    pub async fn trust_history(&self, agent_id: &str, limit: usize) -> WardenResult<Vec<TrustUpdateRecord>> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| trust_ops::list_trust_updates(conn, workspace_id, agent_id, limit))
            .await
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    /// Score one outcome in [0, 1].
    ///
    /// Outcomes below 0.5 are violations and demote the agent a stage
    /// instead of going through the EWMA. `verdict_ref` is the ledger entry
    /// that produced the outcome, if any.
    #[instrument(skip(self))]
    pub async fn update_trust(
        &self,
        agent_id: &str,
        outcome: f64,
        context: RiskContext,
        verdict_ref: Option<i64>,
    ) -> WardenResult<TrustUpdateRecord> {
        engine::check_unit("outcome", outcome)?;
        let lock = self.agent_lock(agent_id);
        let _guard = lock.lock().await;
        let now = now_ts();

        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let mut agent = self.load(conn, agent_id)?;
                    let old = agent.trust_score;
                    let (raw, kind) = if outcome < 0.5 {
                        (engine::violation_penalty(old, &self.config), TrustUpdateKind::Violation)
                    } else {
                        (
                            engine::ewma_update(old, outcome, context, &self.config)?,
                            TrustUpdateKind::Ewma,
                        )
                    };
                    let new = self.floor(&agent, old, raw, now);
                    agent.verification_count += 1;
                    let grade = match context {
                        RiskContext::HighRisk => RiskGrade::L3,
                        RiskContext::LowRisk => RiskGrade::L2,
                    };
                    let note = format!("outcome={outcome} context={context}");
                    self.commit(
                        conn,
                        &mut agent,
                        new,
                        kind,
                        &note,
                        grade,
                        json!({ "outcome": outcome, "context": context.as_str(), "verdict_ref": verdict_ref }),
                        now,
                    )
                })
            })
            .await
    }

    /// Deduct a micro-penalty, truncated to what is left of today's cap.
    #[instrument(skip(self))]
    pub async fn apply_micro_penalty(
        &self,
        agent_id: &str,
        kind: MicroPenaltyKind,
        note: &str,
    ) -> WardenResult<TrustUpdateRecord> {
        let lock = self.agent_lock(agent_id);
        let _guard = lock.lock().await;
        let now = now_ts();

        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    self.micro_penalty_with_conn(conn, agent_id, kind, note, now)
                })
            })
            .await
    }

    /// Score a prediction the agent made with `confidence` in [0, 1].
    ///
    /// The first prediction that lifts the rolling Brier score above the
    /// honest-error threshold costs a miscalibration micro-penalty in the
    /// same transaction. No quarantine: the honest-error track is coaching.
    #[instrument(skip(self))]
    pub async fn record_prediction(
        &self,
        agent_id: &str,
        confidence: f64,
        correct: bool,
    ) -> WardenResult<PredictionOutcome> {
        let brier = engine::brier_contribution(confidence, correct)?;
        let lock = self.agent_lock(agent_id);
        let _guard = lock.lock().await;
        let now = now_ts();
        let workspace_id = self.storage.workspace_id();

        let outcome = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    self.load(conn, agent_id)?;
                    let before = self.calibration_with_conn(conn, agent_id)?;
                    calibration_ops::insert_prediction(
                        conn,
                        workspace_id,
                        agent_id,
                        confidence,
                        correct,
                        brier,
                        &fmt_ts(&now),
                    )?;
                    let report = self.calibration_with_conn(conn, agent_id)?;
                    let penalty = if report.honest_error_triggered() && !before.honest_error_triggered() {
                        let note = format!(
                            "Brier score {:.4} above {}",
                            report.brier_score.unwrap_or_default(),
                            self.config.honest_error_brier
                        );
                        Some(self.micro_penalty_with_conn(
                            conn,
                            agent_id,
                            MicroPenaltyKind::Miscalibration,
                            &note,
                            now,
                        )?)
                    } else {
                        None
                    };
                    Ok(PredictionOutcome { report, penalty })
                })
            })
            .await?;
        if outcome.penalty.is_some() {
            warn!(agent_id, brier = ?outcome.report.brier_score, "agent moved to honest-error track");
        }
        Ok(outcome)
    }

    pub async fn calibration_report(&self, agent_id: &str) -> WardenResult<CalibrationReport> {
        self.storage
            .with_reader(|conn| {
                self.load(conn, agent_id)?;
                self.calibration_with_conn(conn, agent_id)
            })
            .await
    }

    pub async fn apply_temporal_decay(&self, agent_id: &str) -> WardenResult<Option<TrustUpdateRecord>> {
        self.apply_temporal_decay_at(agent_id, now_ts()).await
    }

    /// Decay an idle agent toward the baseline as of `now`. Returns `None`
    /// when the change is too small to record.
    pub async fn apply_temporal_decay_at(
        &self,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> WardenResult<Option<TrustUpdateRecord>> {
        let now = stored_ts(now);
        let lock = self.agent_lock(agent_id);
        let _guard = lock.lock().await;

        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| self.decay_with_conn(conn, agent_id, now))
            })
            .await
    }

    /// Decay every agent whose last update is at least a day old.
    pub async fn decay_idle_agents_at(&self, now: DateTime<Utc>) -> WardenResult<Vec<TrustUpdateRecord>> {
        let workspace_id = self.storage.workspace_id();
        let cutoff = now - Duration::days(1);
        let idle = self
            .storage
            .with_reader(|conn| agent_ops::list_idle_since(conn, workspace_id, &cutoff))
            .await?;
        let mut applied = Vec::new();
        for agent_id in idle {
            if let Some(update) = self.apply_temporal_decay_at(&agent_id, now).await? {
                applied.push(update);
            }
        }
        Ok(applied)
    }

    /// Demote, quarantine and record a cooling-off period, atomically.
    ///
    /// Malicious violations go on the manipulation track; others are
    /// honest errors.
    #[instrument(skip(self))]
    pub async fn apply_violation(
        &self,
        agent_id: &str,
        reason: &str,
        is_malicious: bool,
    ) -> WardenResult<ViolationOutcome> {
        let lock = self.agent_lock(agent_id);
        let _guard = lock.lock().await;
        let now = now_ts();
        let track = if is_malicious {
            QuarantineTrack::Manipulation
        } else {
            QuarantineTrack::HonestError
        };
        let hours = engine::cooling_off_hours(is_malicious, &self.config);

        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let mut agent = self.load(conn, agent_id)?;
                    let old = agent.trust_score;
                    let raw = engine::violation_penalty(old, &self.config);
                    let new = self.floor(&agent, old, raw, now);
                    let update = self.commit(
                        conn,
                        &mut agent,
                        new,
                        TrustUpdateKind::Violation,
                        reason,
                        RiskGrade::L3,
                        json!({ "reason": reason, "malicious": is_malicious }),
                        now,
                    )?;

                    let quarantine = self
                        .quarantine
                        .start_with_conn(conn, agent_id, reason, track, now)?;

                    let cooling = TrustUpdateRecord {
                        id: 0,
                        agent_id: agent_id.to_string(),
                        old_score: new,
                        new_score: new,
                        delta: 0.0,
                        kind: TrustUpdateKind::CoolingOff,
                        context: format!("Duration: {hours}h (malicious={is_malicious})"),
                        ledger_ref: update.ledger_ref,
                        created_at: now,
                    };
                    trust_ops::insert_trust_update(conn, self.storage.workspace_id(), &cooling)?;

                    Ok(ViolationOutcome {
                        update,
                        quarantine,
                        cooling_off_hours: hours,
                    })
                })
            })
            .await
    }

    /// Recompute influence weights for every active agent.
    ///
    /// Scores are L1-normalized, then blended with an anchor distribution
    /// that puts all anchor weight on anchor roles. Quarantined agents get
    /// zero influence. Read and write-back share one transaction.
    #[instrument(skip(self))]
    pub async fn update_influence_weights(&self) -> WardenResult<NormalizationReport> {
        let workspace_id = self.storage.workspace_id();
        let report = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let agents = agent_ops::list_agents(conn, workspace_id, None)?;
                    let (active, held): (Vec<Agent>, Vec<Agent>) =
                        agents.into_iter().partition(Agent::is_active);

                    let scores: Vec<f64> = active.iter().map(|a| a.trust_score).collect();
                    let anchor_mask: Vec<f64> = active
                        .iter()
                        .map(|a| if self.config.is_anchor_role(&a.role) { 1.0 } else { 0.0 })
                        .collect();
                    let anchor_count = anchor_mask.iter().filter(|m| **m > 0.0).count();
                    let weights = engine::anchor_damp(
                        &engine::normalize_l1(&scores),
                        &engine::normalize_l1(&anchor_mask),
                        self.config.anchor_damping,
                    )?;

                    for (agent, weight) in active.iter().zip(&weights) {
                        agent_ops::update_influence_weight(conn, workspace_id, &agent.agent_id, *weight)?;
                    }
                    for agent in &held {
                        agent_ops::update_influence_weight(conn, workspace_id, &agent.agent_id, 0.0)?;
                    }

                    let report = NormalizationReport {
                        agent_count: active.len(),
                        anchor_count,
                        weights: active
                            .iter()
                            .map(|a| a.agent_id.clone())
                            .zip(weights)
                            .collect(),
                    };
                    self.ledger.append_with_conn(
                        conn,
                        JUDGE_IDENTITY,
                        EventType::Normalization,
                        RiskGrade::L1,
                        &json!({
                            "agent_count": report.agent_count,
                            "anchor_count": report.anchor_count,
                            "quarantined": held.len(),
                            "damping": self.config.anchor_damping,
                        }),
                    )?;
                    Ok(report)
                })
            })
            .await?;
        events::normalization_run(report.agent_count, report.anchor_count);
        Ok(report)
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn load(&self, conn: &Connection, agent_id: &str) -> WardenResult<Agent> {
        agent_ops::get_agent(conn, self.storage.workspace_id(), agent_id)?
            .ok_or_else(|| TrustError::AgentNotFound(agent_id.to_string()).into())
    }

    fn floor(&self, agent: &Agent, old: f64, new: f64, now: DateTime<Utc>) -> f64 {
        let probation = engine::in_probation(agent.verification_count, agent.created_at, now, &self.config);
        engine::apply_probation_floor(old, new, probation, &self.config)
    }

    fn micro_penalty_with_conn(
        &self,
        conn: &Connection,
        agent_id: &str,
        kind: MicroPenaltyKind,
        note: &str,
        now: DateTime<Utc>,
    ) -> WardenResult<TrustUpdateRecord> {
        let today = now.date_naive();
        let mut agent = self.load(conn, agent_id)?;
        if agent.penalty_reset_date < today {
            agent.daily_penalty_sum = 0.0;
        }
        agent.penalty_reset_date = today;

        let old = agent.trust_score;
        let base = self.config.micro_penalty(kind);
        let (raw, applied) = engine::micro_penalty(old, base, agent.daily_penalty_sum, &self.config);
        agent.daily_penalty_sum += applied;
        let new = self.floor(&agent, old, raw, now);
        if applied < base {
            debug!(agent_id, base, applied, "micro-penalty truncated by daily cap");
        }
        self.commit(
            conn,
            &mut agent,
            new,
            TrustUpdateKind::MicroPenalty,
            &format!("{kind}: {note}"),
            RiskGrade::L2,
            json!({ "penalty": kind.as_str(), "base": base, "applied": applied, "note": note }),
            now,
        )
    }

    fn calibration_with_conn(&self, conn: &Connection, agent_id: &str) -> WardenResult<CalibrationReport> {
        let workspace_id = self.storage.workspace_id();
        let recent = calibration_ops::recent_contributions(
            conn,
            workspace_id,
            agent_id,
            self.config.calibration_window,
        )?;
        let totals = calibration_ops::totals(conn, workspace_id, agent_id)?;
        let brier_score = engine::brier_score(&recent);
        Ok(CalibrationReport {
            agent_id: agent_id.to_string(),
            brier_score,
            prediction_count: totals.count,
            accuracy: totals.accuracy,
            average_confidence: totals.average_confidence,
            status: engine::calibration_status(brier_score, &self.config),
        })
    }

    fn decay_with_conn(
        &self,
        conn: &Connection,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> WardenResult<Option<TrustUpdateRecord>> {
        let mut agent = self.load(conn, agent_id)?;
        let old = agent.trust_score;
        let new = engine::temporal_decay(old, agent.last_trust_update, now, &self.config);
        if (new - old).abs() < self.config.min_decay_change {
            return Ok(None);
        }
        let days = (now - agent.last_trust_update).num_days();
        self.commit(
            conn,
            &mut agent,
            new,
            TrustUpdateKind::TemporalDecay,
            &format!("idle {days} days"),
            RiskGrade::L1,
            json!({ "idle_days": days, "baseline": self.config.neutral_baseline }),
            now,
        )
        .map(Some)
    }

    /// Persist a new score: agent row, ledger entry, history row.
    #[allow(clippy::too_many_arguments)]
    fn commit(
        &self,
        conn: &Connection,
        agent: &mut Agent,
        new_score: f64,
        kind: TrustUpdateKind,
        note: &str,
        grade: RiskGrade,
        detail: serde_json::Value,
        now: DateTime<Utc>,
    ) -> WardenResult<TrustUpdateRecord> {
        let old = agent.trust_score;
        let old_stage = agent.trust_stage;
        agent.trust_score = new_score.clamp(0.0, 1.0);
        agent.trust_stage = engine::stage_for(agent.trust_score, &self.config);
        agent.last_trust_update = now;
        agent_ops::update_trust_state(conn, agent)?;

        let event_type = match kind {
            TrustUpdateKind::MicroPenalty => EventType::Penalty,
            _ => EventType::TrustUpdate,
        };
        let entry = self.ledger.append_with_conn(
            conn,
            JUDGE_IDENTITY,
            event_type,
            grade,
            &json!({
                "agent_id": agent.agent_id,
                "kind": kind.as_str(),
                "old_score": old,
                "new_score": agent.trust_score,
                "old_stage": old_stage.as_str(),
                "new_stage": agent.trust_stage.as_str(),
                "detail": detail,
            }),
        )?;

        let mut record = TrustUpdateRecord {
            id: 0,
            agent_id: agent.agent_id.clone(),
            old_score: old,
            new_score: agent.trust_score,
            delta: agent.trust_score - old,
            kind,
            context: note.to_string(),
            ledger_ref: Some(entry.entry_id),
            created_at: now,
        };
        record.id = trust_ops::insert_trust_update(conn, self.storage.workspace_id(), &record)?;
        events::trust_updated(
            &agent.agent_id,
            kind.as_str(),
            old,
            agent.trust_score,
            agent.trust_stage.as_str(),
        );
        Ok(record)
    }
}
