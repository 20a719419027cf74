//! Agent quarantine windows.
//!
//! A window is a row in `agent_quarantine`; the agent's `status` column
//! mirrors whether any window is in force. Expiry is lazy: a window past its
//! end is released the next time the agent is checked, or by a sweep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;

use warden_core::config::QuarantineConfig;
use warden_core::constants::JUDGE_IDENTITY;
use warden_core::errors::{TrustError, WardenResult};
use warden_core::models::{
    AgentStatus, EventType, QuarantineRecord, QuarantineStatus, QuarantineTrack, RiskGrade,
};
use warden_ledger::Ledger;
use warden_observability::events;
use warden_storage::queries::{agent_ops, quarantine_ops};
use warden_storage::{fmt_ts, immediate_transaction, now_ts, stored_ts, StorageEngine};

/// Point-in-time view of one agent's quarantine state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarantineStatusReport {
    pub agent_id: String,
    pub quarantined: bool,
    /// The window in force, or the most recent one when none is.
    pub record: Option<QuarantineRecord>,
    /// Zero unless quarantined.
    pub remaining_hours: f64,
}

pub struct QuarantineManager {
    storage: Arc<StorageEngine>,
    ledger: Arc<Ledger>,
    config: QuarantineConfig,
}

impl QuarantineManager {
    pub fn new(storage: Arc<StorageEngine>, ledger: Arc<Ledger>, config: QuarantineConfig) -> Self {
        Self {
            storage,
            ledger,
            config,
        }
    }

    /// Window length for a track.
    pub fn hours_for(&self, track: QuarantineTrack) -> i64 {
        match track {
            QuarantineTrack::HonestError => self.config.honest_error_hours,
            QuarantineTrack::Manipulation => self.config.manipulation_hours,
        }
    }

    /// Open a window inside the caller's transaction.
    ///
    /// A zero-hour window is recorded already `COMPLETED` and leaves the
    /// agent active. Otherwise the agent is marked `QUARANTINED`.
    pub fn start_with_conn(
        &self,
        conn: &Connection,
        agent_id: &str,
        reason: &str,
        track: QuarantineTrack,
        now: DateTime<Utc>,
    ) -> WardenResult<QuarantineRecord> {
        let now = stored_ts(now);
        let workspace_id = self.storage.workspace_id();
        if agent_ops::get_agent(conn, workspace_id, agent_id)?.is_none() {
            return Err(TrustError::AgentNotFound(agent_id.to_string()).into());
        }

        let hours = self.hours_for(track).max(0);
        let status = if hours > 0 {
            QuarantineStatus::Active
        } else {
            QuarantineStatus::Completed
        };
        let mut record = QuarantineRecord {
            id: 0,
            agent_id: agent_id.to_string(),
            reason: reason.to_string(),
            track,
            started_at: now,
            ends_at: now + Duration::hours(hours),
            status,
        };
        record.id = quarantine_ops::insert_quarantine(conn, workspace_id, &record)?;
        if status == QuarantineStatus::Active {
            agent_ops::update_status(conn, workspace_id, agent_id, AgentStatus::Quarantined)?;
        }

        self.ledger.append_with_conn(
            conn,
            JUDGE_IDENTITY,
            EventType::QuarantineStarted,
            RiskGrade::L3,
            &json!({
                "quarantine_id": record.id,
                "agent_id": agent_id,
                "track": track.as_str(),
                "reason": reason,
                "hours": hours,
                "ends_at": fmt_ts(&record.ends_at),
                "status": status.as_str(),
            }),
        )?;
        events::agent_quarantined(agent_id, track.as_str(), hours, reason);
        Ok(record)
    }

    pub async fn quarantine(
        &self,
        agent_id: &str,
        reason: &str,
        track: QuarantineTrack,
    ) -> WardenResult<QuarantineRecord> {
        let now = now_ts();
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    self.start_with_conn(conn, agent_id, reason, track, now)
                })
            })
            .await
    }

    pub async fn is_quarantined(&self, agent_id: &str) -> WardenResult<bool> {
        self.is_quarantined_at(agent_id, now_ts()).await
    }

    /// Whether a window is in force at `now`. Windows that have run out are
    /// released as a side effect.
    pub async fn is_quarantined_at(&self, agent_id: &str, now: DateTime<Utc>) -> WardenResult<bool> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let active = quarantine_ops::list_active_for_agent(conn, workspace_id, agent_id)?;
                    let mut in_force = false;
                    for record in active {
                        if record.is_in_force(now) {
                            in_force = true;
                        } else {
                            self.release_with_conn(conn, &record, QuarantineStatus::Completed, JUDGE_IDENTITY, now)?;
                        }
                    }
                    Ok(in_force)
                })
            })
            .await
    }

    /// The in-force window with the latest end, without releasing anything.
    pub async fn in_force(&self, agent_id: &str) -> WardenResult<Option<QuarantineRecord>> {
        let workspace_id = self.storage.workspace_id();
        let now = now_ts();
        let active = self
            .storage
            .with_reader(|conn| quarantine_ops::list_active_for_agent(conn, workspace_id, agent_id))
            .await?;
        Ok(active.into_iter().find(|r| r.is_in_force(now)))
    }

    pub async fn status(&self, agent_id: &str) -> WardenResult<QuarantineStatusReport> {
        let now = now_ts();
        if let Some(record) = self.in_force(agent_id).await? {
            let remaining = (record.ends_at - now).num_seconds().max(0) as f64 / 3600.0;
            return Ok(QuarantineStatusReport {
                agent_id: agent_id.to_string(),
                quarantined: true,
                record: Some(record),
                remaining_hours: remaining,
            });
        }
        let workspace_id = self.storage.workspace_id();
        let latest = self
            .storage
            .with_reader(|conn| quarantine_ops::latest_for_agent(conn, workspace_id, agent_id))
            .await?;
        Ok(QuarantineStatusReport {
            agent_id: agent_id.to_string(),
            quarantined: false,
            record: latest,
            remaining_hours: 0.0,
        })
    }

    /// Every window in force, soonest end first.
    pub async fn active_quarantines(&self) -> WardenResult<Vec<QuarantineRecord>> {
        let workspace_id = self.storage.workspace_id();
        let now = fmt_ts(&now_ts());
        self.storage
            .with_reader(|conn| quarantine_ops::list_in_force(conn, workspace_id, &now))
            .await
    }

    /// Operator release of every active window for `agent_id`. Returns the
    /// lifted windows; empty when the agent was not quarantined.
    pub async fn lift(&self, agent_id: &str, operator: &str) -> WardenResult<Vec<QuarantineRecord>> {
        let workspace_id = self.storage.workspace_id();
        let now = now_ts();
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let active = quarantine_ops::list_active_for_agent(conn, workspace_id, agent_id)?;
                    let mut lifted = Vec::with_capacity(active.len());
                    for record in active {
                        lifted.push(self.release_with_conn(
                            conn,
                            &record,
                            QuarantineStatus::Lifted,
                            operator,
                            now,
                        )?);
                    }
                    Ok(lifted)
                })
            })
            .await
    }

    pub async fn release_expired(&self) -> WardenResult<Vec<QuarantineRecord>> {
        self.release_expired_at(now_ts()).await
    }

    /// Complete every active window that ended at or before `now`.
    pub async fn release_expired_at(&self, now: DateTime<Utc>) -> WardenResult<Vec<QuarantineRecord>> {
        let workspace_id = self.storage.workspace_id();
        let cutoff = fmt_ts(&now);
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let expired = quarantine_ops::list_expired(conn, workspace_id, &cutoff)?;
                    let mut released = Vec::with_capacity(expired.len());
                    for record in expired {
                        released.push(self.release_with_conn(
                            conn,
                            &record,
                            QuarantineStatus::Completed,
                            JUDGE_IDENTITY,
                            now,
                        )?);
                    }
                    Ok(released)
                })
            })
            .await
    }

    /// Close one window. The agent goes back to active only when no other
    /// window still holds it.
    fn release_with_conn(
        &self,
        conn: &Connection,
        record: &QuarantineRecord,
        status: QuarantineStatus,
        signer: &str,
        now: DateTime<Utc>,
    ) -> WardenResult<QuarantineRecord> {
        let workspace_id = self.storage.workspace_id();
        quarantine_ops::set_status(conn, workspace_id, record.id, status)?;

        let still_held = quarantine_ops::list_active_for_agent(conn, workspace_id, &record.agent_id)?
            .iter()
            .any(|r| r.id != record.id && r.is_in_force(now));
        if !still_held {
            agent_ops::update_status(conn, workspace_id, &record.agent_id, AgentStatus::Active)?;
        }

        self.ledger.append_with_conn(
            conn,
            signer,
            EventType::QuarantineReleased,
            RiskGrade::L3,
            &json!({
                "quarantine_id": record.id,
                "agent_id": record.agent_id,
                "track": record.track.as_str(),
                "status": status.as_str(),
                "released_by": signer,
            }),
        )?;
        events::agent_released(&record.agent_id, status.as_str());

        Ok(QuarantineRecord {
            status,
            ..record.clone()
        })
    }
}
