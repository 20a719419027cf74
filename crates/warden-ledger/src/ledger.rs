//! The ledger: append, replay, integrity halt and the read-only query surface.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use warden_core::config::LedgerConfig;
use warden_core::constants::GENESIS_HASH;
use warden_core::errors::{LedgerError, WardenResult};
use warden_core::models::{EventType, LedgerEntry, RiskGrade};
use warden_core::traits::ISigner;
use warden_observability::events;
use warden_storage::queries::ledger_ops::{self, EntryFilter, InsertEntryParams};
use warden_storage::queries::state_ops;
use warden_storage::{fmt_ts, immediate_transaction, StorageEngine};

use crate::canonical::canonical_json;
use crate::hash::compute_entry_hash;
use crate::query::LedgerQuery;
use crate::signer::DigestSigner;

/// Outcome of replaying a workspace chain from genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    pub entries_checked: u64,
    /// Entries whose recomputed hash or link does not match what is stored.
    /// Once one entry breaks, every later entry breaks with it.
    pub broken: Vec<i64>,
    pub signature_failures: Vec<i64>,
    /// Recomputed hash of the last entry (genesis for an empty chain).
    pub tail_hash: String,
}

impl ChainReport {
    pub fn is_intact(&self) -> bool {
        self.broken.is_empty() && self.signature_failures.is_empty()
    }

    /// Lowest failing entry id across both failure kinds.
    pub fn first_broken(&self) -> Option<i64> {
        self.broken
            .iter()
            .chain(self.signature_failures.iter())
            .copied()
            .min()
    }

    fn describe(&self) -> String {
        format!(
            "hash/link mismatch at entries {:?}; signature failures at {:?}",
            self.broken, self.signature_failures
        )
    }
}

/// The hash-chained ledger for one workspace.
///
/// Appends are linearized by the storage engine's single write connection;
/// every append reads the tail and inserts inside one `BEGIN IMMEDIATE`
/// transaction, and `UNIQUE(workspace_id, prev_hash)` rejects any fork.
pub struct Ledger {
    storage: Arc<StorageEngine>,
    signer: Arc<dyn ISigner>,
    config: LedgerConfig,
}

impl Ledger {
    pub fn new(storage: Arc<StorageEngine>, signer: Arc<dyn ISigner>, config: LedgerConfig) -> Self {
        Self {
            storage,
            signer,
            config,
        }
    }

    /// Ledger with the keyless [`DigestSigner`] and default config.
    pub fn with_default_signer(storage: Arc<StorageEngine>) -> Self {
        Self::new(storage, Arc::new(DigestSigner), LedgerConfig::default())
    }

    /// Construct and, when `verify_on_open` is set, replay the chain first.
    pub async fn open(
        storage: Arc<StorageEngine>,
        signer: Arc<dyn ISigner>,
        config: LedgerConfig,
    ) -> WardenResult<Self> {
        let ledger = Self::new(storage, signer, config);
        if ledger.config.verify_on_open {
            ledger.verify_chain().await?;
        }
        Ok(ledger)
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    // ── Append ──────────────────────────────────────────────────────────────

    /// Append an entry inside the caller's open transaction.
    ///
    /// Used by subsystems that must commit their own rows and the ledger
    /// record atomically. Fails with [`LedgerError::Halted`] while the
    /// integrity halt is set.
    #[instrument(skip(self, conn, payload))]
    pub fn append_with_conn(
        &self,
        conn: &Connection,
        signer: &str,
        event_type: EventType,
        risk_grade: RiskGrade,
        payload: &Value,
    ) -> WardenResult<LedgerEntry> {
        if let Some(reason) = state_ops::get_integrity_halt(conn, self.storage.workspace_id())? {
            return Err(LedgerError::Halted { reason }.into());
        }
        self.insert_chained(conn, signer, event_type, risk_grade, payload)
    }

    /// Append an entry in its own transaction. Returns the stored entry,
    /// whose `entry_hash` is the new chain tail.
    pub async fn append(
        &self,
        signer: &str,
        event_type: EventType,
        risk_grade: RiskGrade,
        payload: &Value,
    ) -> WardenResult<LedgerEntry> {
        self.storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    self.append_with_conn(conn, signer, event_type, risk_grade, payload)
                })
            })
            .await
    }

    fn insert_chained(
        &self,
        conn: &Connection,
        signer: &str,
        event_type: EventType,
        risk_grade: RiskGrade,
        payload: &Value,
    ) -> WardenResult<LedgerEntry> {
        let workspace_id = self.storage.workspace_id();
        let payload = canonical_json(payload);
        let prev_hash = ledger_ops::tail_hash(conn, workspace_id)?
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let timestamp = fmt_ts(&Utc::now());
        let entry_hash = compute_entry_hash(&timestamp, signer, &payload, &prev_hash);
        let signature = self.signer.sign(signer, entry_hash.as_bytes())?;

        let entry_id = ledger_ops::insert_entry(
            conn,
            &InsertEntryParams {
                workspace_id,
                timestamp: &timestamp,
                signer,
                event_type: event_type.as_str(),
                risk_grade: risk_grade.as_str(),
                payload: &payload,
                entry_hash: &entry_hash,
                prev_hash: &prev_hash,
                signature: &signature,
            },
        )?;
        events::ledger_appended(entry_id, event_type.as_str(), &entry_hash);

        Ok(LedgerEntry {
            entry_id,
            timestamp,
            signer: signer.to_string(),
            event_type,
            risk_grade,
            payload,
            entry_hash,
            prev_hash,
            signature,
        })
    }

    // ── Verification ────────────────────────────────────────────────────────

    /// Replay `entries` (in append order) from genesis.
    ///
    /// The running hash is the *recomputed* one, so a change at entry n
    /// breaks n and every entry after it.
    pub fn replay_entries(&self, entries: &[LedgerEntry]) -> ChainReport {
        let mut report = ChainReport {
            tail_hash: GENESIS_HASH.to_string(),
            ..Default::default()
        };
        for entry in entries {
            let computed =
                compute_entry_hash(&entry.timestamp, &entry.signer, &entry.payload, &report.tail_hash);
            if computed != entry.entry_hash || entry.prev_hash != report.tail_hash {
                report.broken.push(entry.entry_id);
            }
            if !self
                .signer
                .verify(&entry.signer, entry.entry_hash.as_bytes(), &entry.signature)
            {
                report.signature_failures.push(entry.entry_id);
            }
            report.tail_hash = computed;
            report.entries_checked += 1;
        }
        report
    }

    /// Replay the stored chain without side effects.
    pub async fn replay(&self) -> WardenResult<ChainReport> {
        let workspace_id = self.storage.workspace_id();
        let entries = self
            .storage
            .with_reader(|conn| ledger_ops::list_chain(conn, workspace_id))
            .await?;
        Ok(self.replay_entries(&entries))
    }

    /// Replay the chain and halt on the first failure.
    ///
    /// A mismatch is never repaired: the halt flag is persisted and every
    /// later append fails until [`clear_halt`](Self::clear_halt).
    pub async fn verify_chain(&self) -> WardenResult<ChainReport> {
        let report = self.replay().await?;
        events::chain_verified(report.entries_checked, report.is_intact());

        let Some(first) = report.first_broken() else {
            return Ok(report);
        };

        let details = report.describe();
        let workspace_id = self.storage.workspace_id();
        let now = fmt_ts(&Utc::now());
        self.storage
            .with_writer(|conn| state_ops::set_integrity_halt(conn, workspace_id, Some(&details), &now))
            .await?;
        events::integrity_halt(first, &details);

        if !report.broken.contains(&first) {
            let signer = self
                .get(first)
                .await?
                .map(|e| e.signer)
                .unwrap_or_default();
            return Err(LedgerError::SignatureInvalid {
                entry_id: first,
                signer,
            }
            .into());
        }
        Err(LedgerError::IntegrityViolation {
            entry_id: first,
            details,
        }
        .into())
    }

    /// Reason recorded by the last integrity failure, if writes are halted.
    pub async fn halt_reason(&self) -> WardenResult<Option<String>> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| state_ops::get_integrity_halt(conn, workspace_id))
            .await
    }

    /// Operator reset of the integrity halt. Records `HALT_CLEARED`, signed
    /// by the operator, with the reason that was cleared.
    pub async fn clear_halt(&self, operator: &str) -> WardenResult<LedgerEntry> {
        let workspace_id = self.storage.workspace_id();
        let entry = self
            .storage
            .with_writer(|conn| {
                immediate_transaction(conn, |conn| {
                    let cleared = state_ops::get_integrity_halt(conn, workspace_id)?;
                    state_ops::set_integrity_halt(conn, workspace_id, None, &fmt_ts(&Utc::now()))?;
                    self.insert_chained(
                        conn,
                        operator,
                        EventType::HaltCleared,
                        RiskGrade::L3,
                        &json!({ "operator": operator, "cleared": cleared }),
                    )
                })
            })
            .await?;
        events::halt_cleared(operator);
        Ok(entry)
    }

    // ── Query surface ───────────────────────────────────────────────────────

    pub async fn query(&self, query: &LedgerQuery) -> WardenResult<Vec<LedgerEntry>> {
        let workspace_id = self.storage.workspace_id();
        let filter = EntryFilter {
            event_type: query.event_type.map(|e| e.as_str()),
            after_id: query.after,
            limit: Some(query.limit_or(self.config.default_query_limit)),
            ascending: query.ascending,
        };
        self.storage
            .with_reader(|conn| ledger_ops::query_entries(conn, workspace_id, &filter))
            .await
    }

    /// The newest `n` entries, newest first.
    pub async fn last_n(&self, n: usize) -> WardenResult<Vec<LedgerEntry>> {
        self.query(&LedgerQuery::new().limit(n)).await
    }

    /// Entries after `entry_id`, newest first.
    pub async fn after(&self, entry_id: i64) -> WardenResult<Vec<LedgerEntry>> {
        self.query(&LedgerQuery::new().after(entry_id)).await
    }

    pub async fn by_event_type(&self, event_type: EventType) -> WardenResult<Vec<LedgerEntry>> {
        self.query(&LedgerQuery::new().event_type(event_type)).await
    }

    pub async fn get(&self, entry_id: i64) -> WardenResult<Option<LedgerEntry>> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| ledger_ops::get_entry(conn, workspace_id, entry_id))
            .await
    }

    pub async fn count(&self) -> WardenResult<u64> {
        let workspace_id = self.storage.workspace_id();
        self.storage
            .with_reader(|conn| ledger_ops::count_entries(conn, workspace_id))
            .await
    }

    /// Stored hash of the newest entry, or genesis for an empty chain.
    pub async fn tail_hash(&self) -> WardenResult<String> {
        let workspace_id = self.storage.workspace_id();
        let tail = self
            .storage
            .with_reader(|conn| ledger_ops::tail_hash(conn, workspace_id))
            .await?;
        Ok(tail.unwrap_or_else(|| GENESIS_HASH.to_string()))
    }
}
