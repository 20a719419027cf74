//! Deadlines on the L3 approval queue.
//!
//! Every pending request owes a decision within `sla_hours` of being
//! queued. Overdue requests are reported on each check; the first check
//! that finds one also records `L3_SLA_BREACH` in the ledger.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use warden_core::config::ApprovalConfig;
use warden_core::constants::JUDGE_IDENTITY;
use warden_core::errors::WardenResult;
use warden_core::models::{ApprovalRequest, EventType, RiskGrade, SlaNotice, SlaSeverity, SlaStatus};
use warden_ledger::Ledger;
use warden_observability::events;
use warden_storage::queries::approval_ops;
use warden_storage::{fmt_ts, immediate_transaction, StorageEngine};

pub struct SlaMonitor {
    storage: Arc<StorageEngine>,
    ledger: Arc<Ledger>,
    config: ApprovalConfig,
}

impl SlaMonitor {
    pub fn new(storage: Arc<StorageEngine>, ledger: Arc<Ledger>, config: ApprovalConfig) -> Self {
        Self {
            storage,
            ledger,
            config,
        }
    }

    pub fn config(&self) -> &ApprovalConfig {
        &self.config
    }

    pub fn deadline(&self, request: &ApprovalRequest) -> DateTime<Utc> {
        request.requested_at + Duration::hours(self.config.sla_hours)
    }

    /// The breach notice for `request` as of `now`, if it is overdue.
    pub fn notice(&self, request: &ApprovalRequest, now: DateTime<Utc>) -> Option<SlaNotice> {
        let deadline = self.deadline(request);
        if now <= deadline {
            return None;
        }
        let hours = (now - deadline).num_milliseconds() as f64 / 3_600_000.0;
        let hours_overdue = (hours * 100.0).round() / 100.0;
        let severity = if hours_overdue > self.config.critical_after_hours as f64 {
            SlaSeverity::Critical
        } else {
            SlaSeverity::Warning
        };
        Some(SlaNotice {
            queue_id: request.queue_id,
            artifact_hash: request.artifact_hash.clone(),
            requesting_agent: request.requesting_agent.clone(),
            deadline,
            hours_overdue,
            severity,
        })
    }

    pub async fn overdue(&self) -> WardenResult<Vec<SlaNotice>> {
        self.overdue_at(Utc::now()).await
    }

    /// Overdue pending requests, oldest first. Read-only.
    pub async fn overdue_at(&self, now: DateTime<Utc>) -> WardenResult<Vec<SlaNotice>> {
        let pending = self.pending().await?;
        Ok(pending.iter().filter_map(|r| self.notice(r, now)).collect())
    }

    pub async fn status(&self) -> WardenResult<SlaStatus> {
        self.status_at(Utc::now()).await
    }

    pub async fn status_at(&self, now: DateTime<Utc>) -> WardenResult<SlaStatus> {
        let workspace_id = self.storage.workspace_id();
        let (pending, completed_count) = self
            .storage
            .with_reader(|conn| {
                Ok((
                    approval_ops::list_pending(conn, workspace_id)?,
                    approval_ops::count_decided(conn, workspace_id)?,
                ))
            })
            .await?;
        let overdue_count = pending.iter().filter(|r| self.notice(r, now).is_some()).count();
        let compliance_pct = if overdue_count == 0 {
            100.0
        } else {
            (pending.len() - overdue_count) as f64 / pending.len() as f64 * 100.0
        };
        Ok(SlaStatus {
            pending_count: pending.len(),
            overdue_count,
            completed_count,
            compliance_pct,
            oldest_pending: pending.iter().map(|r| r.requested_at).min(),
            next_deadline: pending.iter().map(|r| self.deadline(r)).min(),
        })
    }

    pub async fn escalate_overdue(&self) -> WardenResult<Vec<SlaNotice>> {
        self.escalate_overdue_at(Utc::now()).await
    }

    /// Report every overdue request. Requests breaching for the first time
    /// are stamped and get one `L3_SLA_BREACH` ledger entry each, in a
    /// single transaction.
    pub async fn escalate_overdue_at(&self, now: DateTime<Utc>) -> WardenResult<Vec<SlaNotice>> {
        let workspace_id = self.storage.workspace_id();
        let stamped_at = fmt_ts(&now);
        let (notices, fresh) = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let pending = approval_ops::list_pending(conn, workspace_id)?;
                    let notices: Vec<SlaNotice> =
                        pending.iter().filter_map(|r| self.notice(r, now)).collect();
                    let mut fresh = Vec::new();
                    for notice in &notices {
                        if !approval_ops::mark_sla_escalated(conn, workspace_id, notice.queue_id, &stamped_at)? {
                            continue;
                        }
                        self.ledger.append_with_conn(
                            conn,
                            JUDGE_IDENTITY,
                            EventType::L3SlaBreach,
                            RiskGrade::L3,
                            &json!({
                                "queue_id": notice.queue_id,
                                "artifact_hash": notice.artifact_hash,
                                "requesting_agent": notice.requesting_agent,
                                "deadline": fmt_ts(&notice.deadline),
                                "hours_overdue": notice.hours_overdue,
                                "severity": notice.severity.as_str(),
                            }),
                        )?;
                        fresh.push(notice.queue_id);
                    }
                    Ok((notices, fresh))
                })
            })
            .await?;
        for notice in notices.iter().filter(|n| fresh.contains(&n.queue_id)) {
            events::sla_breached(notice.queue_id, notice.hours_overdue, notice.severity.as_str());
        }
        Ok(notices)
    }

    async fn pending(&self) -> WardenResult<Vec<ApprovalRequest>> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| approval_ops::list_pending(conn, workspace_id))
            .await
    }
}
