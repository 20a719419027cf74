//! The L3 approval queue. An L3 artifact that passed every automated check
//! waits here for an overseer; the decision is what finally scores the
//! submitting agent.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use warden_core::constants::{OVERSEER_IDENTITY, SENTINEL_IDENTITY};
use warden_core::errors::{PolicyError, TrustError, WardenError, WardenResult};
use warden_core::models::{
    ApprovalRequest, ApprovalStatus, EventType, RiskContext, RiskGrade, TrustUpdateRecord,
};
use warden_ledger::Ledger;
use warden_storage::queries::approval_ops;
use warden_storage::{fmt_ts, immediate_transaction, StorageEngine};
use warden_trust::TrustManager;

/// What an overseer decision produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalDecision {
    pub request: ApprovalRequest,
    pub ledger_entry_id: i64,
    pub ledger_hash: String,
    /// None when the requesting agent is not registered in this workspace.
    pub trust_update: Option<TrustUpdateRecord>,
}

pub struct ApprovalQueue {
    storage: Arc<StorageEngine>,
    ledger: Arc<Ledger>,
    trust: Arc<TrustManager>,
}

impl ApprovalQueue {
    pub fn new(storage: Arc<StorageEngine>, ledger: Arc<Ledger>, trust: Arc<TrustManager>) -> Self {
        Self {
            storage,
            ledger,
            trust,
        }
    }

    /// Queue an artifact inside the caller's transaction and record
    /// `L3_APPROVAL_REQUEST`. Returns the queue id.
    pub fn request_with_conn(
        &self,
        conn: &Connection,
        artifact_hash: &str,
        requesting_agent: &str,
        reason: &str,
    ) -> WardenResult<i64> {
        let workspace_id = self.storage.workspace_id();
        let queue_id = approval_ops::insert_request(
            conn,
            workspace_id,
            artifact_hash,
            requesting_agent,
            reason,
            &fmt_ts(&Utc::now()),
        )?;
        self.ledger.append_with_conn(
            conn,
            SENTINEL_IDENTITY,
            EventType::L3ApprovalRequest,
            RiskGrade::L3,
            &json!({
                "queue_id": queue_id,
                "artifact_hash": artifact_hash,
                "requesting_agent": requesting_agent,
                "reason": reason,
            }),
        )?;
        info!(queue_id, artifact_hash, requesting_agent, "L3 approval requested");
        Ok(queue_id)
    }

    pub async fn request_l3_approval(
        &self,
        artifact_hash: &str,
        requesting_agent: &str,
        reason: &str,
    ) -> WardenResult<ApprovalRequest> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let queue_id = self.request_with_conn(conn, artifact_hash, requesting_agent, reason)?;
                    approval_ops::get_request(conn, workspace_id, queue_id)?
                        .ok_or_else(|| PolicyError::ApprovalNotFound(queue_id).into())
                })
            })
            .await
    }

    /// Record an overseer decision, then score the requesting agent: an
    /// approval counts as a high-risk success, a rejection as a failure.
    pub async fn approve_l3(
        &self,
        queue_id: i64,
        approved: bool,
        notes: &str,
    ) -> WardenResult<ApprovalDecision> {
        let workspace_id = self.storage.workspace_id();
        let (status, event_type) = if approved {
            (ApprovalStatus::Approved, EventType::L3Approved)
        } else {
            (ApprovalStatus::Rejected, EventType::L3Rejected)
        };

        let (request, entry) = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let existing = approval_ops::get_request(conn, workspace_id, queue_id)?
                        .ok_or(PolicyError::ApprovalNotFound(queue_id))?;
                    if existing.status != ApprovalStatus::Pending {
                        return Err(PolicyError::AlreadyDecided { queue_id }.into());
                    }
                    approval_ops::decide_request(
                        conn,
                        workspace_id,
                        queue_id,
                        status,
                        notes,
                        &fmt_ts(&Utc::now()),
                    )?;
                    let entry = self.ledger.append_with_conn(
                        conn,
                        OVERSEER_IDENTITY,
                        event_type,
                        RiskGrade::L3,
                        &json!({
                            "queue_id": queue_id,
                            "artifact_hash": existing.artifact_hash,
                            "requesting_agent": existing.requesting_agent,
                            "notes": notes,
                        }),
                    )?;
                    let request = approval_ops::get_request(conn, workspace_id, queue_id)?
                        .ok_or(PolicyError::ApprovalNotFound(queue_id))?;
                    Ok((request, entry))
                })
            })
            .await?;
        info!(queue_id, status = %status, "L3 decision recorded");

        let outcome = if approved { 1.0 } else { 0.0 };
        let trust_update = match self
            .trust
            .update_trust(
                &request.requesting_agent,
                outcome,
                RiskContext::HighRisk,
                Some(entry.entry_id),
            )
            .await
        {
            Ok(update) => Some(update),
            Err(WardenError::Trust(TrustError::AgentNotFound(agent_id))) => {
                debug!(%agent_id, queue_id, "requesting agent not registered; trust unchanged");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(ApprovalDecision {
            request,
            ledger_entry_id: entry.entry_id,
            ledger_hash: entry.entry_hash,
            trust_update,
        })
    }

    /// Pending requests, oldest first.
    pub async fn pending_approvals(&self) -> WardenResult<Vec<ApprovalRequest>> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| approval_ops::list_pending(conn, workspace_id))
            .await
    }
}
