//! Storage tests: migrations, append-only enforcement, workspace isolation,
//! query round trips and file-backed persistence.

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use warden_core::errors::{StorageError, WardenError};
use warden_core::models::*;
use warden_storage::migrations::{self, LATEST_VERSION};
use warden_storage::queries::{
    agent_ops, approval_ops, calibration_ops, ledger_ops, quarantine_ops, source_ops, state_ops,
    trust_ops,
};
use warden_storage::{fmt_ts, immediate_transaction, StorageEngine};

fn make_agent(id: &str, workspace_id: &str) -> Agent {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Agent {
        agent_id: id.to_string(),
        workspace_id: workspace_id.to_string(),
        role: "coder".to_string(),
        trust_score: 0.4,
        trust_stage: TrustStage::Cbt,
        influence_weight: 0.0,
        verification_count: 0,
        daily_penalty_sum: 0.0,
        penalty_reset_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        status: AgentStatus::Active,
        created_at: now,
        last_trust_update: now,
    }
}

fn entry_params<'a>(ws: &'a str, hash: &'a str, prev: &'a str) -> ledger_ops::InsertEntryParams<'a> {
    ledger_ops::InsertEntryParams {
        workspace_id: ws,
        timestamp: "2026-03-01T12:00:00.000000Z",
        signer: "did:warden:sentinel",
        event_type: "AUDIT_PASS",
        risk_grade: "L1",
        payload: "{}",
        entry_hash: hash,
        prev_hash: prev,
        signature: "sig_0",
    }
}

// ── ST-01: migrations ──

#[tokio::test]
async fn migrations_reach_latest_version_and_are_idempotent() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let version = engine
        .with_writer(|conn| migrations::current_version(conn))
        .await
        .unwrap();
    assert_eq!(version, LATEST_VERSION);

    let rerun = engine
        .with_writer(|conn| migrations::run_migrations(conn))
        .await
        .unwrap();
    assert_eq!(rerun, LATEST_VERSION);
}

#[test]
fn partially_migrated_database_resumes_from_its_stored_version() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    migrations::v001_ledger::migrate(&conn).unwrap();
    conn.pragma_update(None, "user_version", 1u32).unwrap();

    assert_eq!(migrations::run_migrations(&conn).unwrap(), LATEST_VERSION);
    assert_eq!(migrations::current_version(&conn).unwrap(), LATEST_VERSION);
    let tables: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
             AND name IN ('agents', 'source_credibility', 'l3_approval_queue', 'system_state',
                          'calibration_log')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 5);
}

// ── ST-02: ledger rows are append-only ──

#[tokio::test]
async fn ledger_update_and_delete_are_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let id = engine
        .with_writer(|conn| ledger_ops::insert_entry(conn, &entry_params("default", "h1", "g")))
        .await
        .unwrap();

    let update = engine
        .with_writer(|conn| {
            conn.execute("UPDATE ledger_entries SET payload = 'x' WHERE entry_id = ?1", [id])
                .map_err(|e| warden_storage::to_storage_err(e.to_string()))
        })
        .await;
    assert!(matches!(
        update,
        Err(WardenError::Storage(StorageError::AppendOnlyViolation { .. }))
    ));

    let delete = engine
        .with_writer(|conn| {
            conn.execute("DELETE FROM ledger_entries WHERE entry_id = ?1", [id])
                .map_err(|e| warden_storage::to_storage_err(e.to_string()))
        })
        .await;
    assert!(matches!(
        delete,
        Err(WardenError::Storage(StorageError::AppendOnlyViolation { .. }))
    ));
}

#[tokio::test]
async fn forked_prev_hash_is_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .with_writer(|conn| ledger_ops::insert_entry(conn, &entry_params("default", "h1", "g")))
        .await
        .unwrap();
    let fork = engine
        .with_writer(|conn| ledger_ops::insert_entry(conn, &entry_params("default", "h2", "g")))
        .await;
    assert!(fork.is_err(), "two entries may not share a predecessor");

    // The same predecessor is fine in a different workspace.
    engine
        .with_writer(|conn| ledger_ops::insert_entry(conn, &entry_params("other", "h3", "g")))
        .await
        .unwrap();
}

// ── ST-03: workspace isolation ──

#[tokio::test]
async fn queries_never_cross_workspaces() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .with_writer(|conn| {
            agent_ops::insert_agent(conn, &make_agent("a-1", "alpha"))?;
            agent_ops::insert_agent(conn, &make_agent("b-1", "beta"))?;
            ledger_ops::insert_entry(conn, &entry_params("alpha", "ha", "g"))?;
            Ok(())
        })
        .await
        .unwrap();

    engine
        .with_reader(|conn| {
            assert!(agent_ops::get_agent(conn, "alpha", "b-1")?.is_none());
            assert_eq!(agent_ops::list_agents(conn, "beta", None)?.len(), 1);
            assert_eq!(ledger_ops::count_entries(conn, "beta")?, 0);
            assert_eq!(ledger_ops::tail_hash(conn, "alpha")?.as_deref(), Some("ha"));
            // Exact match only, no prefix semantics.
            assert_eq!(agent_ops::list_agents(conn, "alph", None)?.len(), 0);
            Ok(())
        })
        .await
        .unwrap();
}

// ── ST-04: agent and trust rows ──

#[tokio::test]
async fn agent_trust_state_round_trips() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut agent = make_agent("agent-7", "default");
    engine
        .with_writer(|conn| agent_ops::insert_agent(conn, &agent))
        .await
        .unwrap();

    agent.trust_score = 0.83;
    agent.trust_stage = TrustStage::Ibt;
    agent.verification_count = 9;
    agent.daily_penalty_sum = 0.015;
    engine
        .with_writer(|conn| {
            agent_ops::update_trust_state(conn, &agent)?;
            agent_ops::update_status(conn, "default", "agent-7", AgentStatus::Quarantined)?;
            trust_ops::insert_trust_update(
                conn,
                "default",
                &TrustUpdateRecord {
                    id: 0,
                    agent_id: "agent-7".to_string(),
                    old_score: 0.4,
                    new_score: 0.83,
                    delta: 0.43,
                    kind: TrustUpdateKind::Ewma,
                    context: "HIGH_RISK".to_string(),
                    ledger_ref: None,
                    created_at: Utc::now(),
                },
            )
        })
        .await
        .unwrap();

    let stored = engine
        .with_reader(|conn| agent_ops::get_agent(conn, "default", "agent-7"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.trust_stage, TrustStage::Ibt);
    assert_eq!(stored.verification_count, 9);
    assert_eq!(stored.status, AgentStatus::Quarantined);
    assert!((stored.trust_score - 0.83).abs() < 1e-12);

    let history = engine
        .with_reader(|conn| trust_ops::list_trust_updates(conn, "default", "agent-7", 10))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, TrustUpdateKind::Ewma);
}

#[tokio::test]
async fn trust_score_outside_unit_interval_is_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut agent = make_agent("agent-x", "default");
    agent.trust_score = 1.5;
    let result = engine
        .with_writer(|conn| agent_ops::insert_agent(conn, &agent))
        .await;
    assert!(result.is_err());
}

// ── ST-05: sources, quarantine, approvals, state ──

#[tokio::test]
async fn source_insert_is_idempotent_and_list_below_filters() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut record = SourceRecord {
        source_id: "abc".to_string(),
        url: "https://blog.example.com/post".to_string(),
        domain: "blog.example.com".to_string(),
        tier: SourceTier::T4,
        base_credibility: 45.0,
        sci: 45.0,
        citation_count: 0,
        failure_count: 0,
        last_verified: None,
    };
    let now = fmt_ts(&Utc::now());
    engine
        .with_writer(|conn| {
            assert!(source_ops::insert_source(conn, "default", &record, &now)?);
            assert!(!source_ops::insert_source(conn, "default", &record, &now)?);
            Ok(())
        })
        .await
        .unwrap();

    record.sci = 35.0;
    record.failure_count = 1;
    engine
        .with_writer(|conn| source_ops::update_source_stats(conn, "default", &record))
        .await
        .unwrap();

    let low = engine
        .with_reader(|conn| source_ops::list_below(conn, "default", 50.0))
        .await
        .unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].failure_count, 1);
    assert!(engine
        .with_reader(|conn| source_ops::list_below(conn, "default", 30.0))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn quarantine_windows_split_into_in_force_and_expired() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let window = |agent: &str, hours: i64| QuarantineRecord {
        id: 0,
        agent_id: agent.to_string(),
        reason: "test".to_string(),
        track: QuarantineTrack::Manipulation,
        started_at: now - Duration::hours(72),
        ends_at: now + Duration::hours(hours),
        status: QuarantineStatus::Active,
    };
    engine
        .with_writer(|conn| {
            agent_ops::insert_agent(conn, &make_agent("q-1", "default"))?;
            agent_ops::insert_agent(conn, &make_agent("q-2", "default"))?;
            quarantine_ops::insert_quarantine(conn, "default", &window("q-1", 24))?;
            quarantine_ops::insert_quarantine(conn, "default", &window("q-2", -1))?;
            Ok(())
        })
        .await
        .unwrap();

    let now_s = fmt_ts(&now);
    let (in_force, expired) = engine
        .with_reader(|conn| {
            Ok((
                quarantine_ops::list_in_force(conn, "default", &now_s)?,
                quarantine_ops::list_expired(conn, "default", &now_s)?,
            ))
        })
        .await
        .unwrap();
    assert_eq!(in_force.len(), 1);
    assert_eq!(in_force[0].agent_id, "q-1");
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].agent_id, "q-2");
}

#[tokio::test]
async fn approval_can_only_be_decided_once() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = fmt_ts(&Utc::now());
    let queue_id = engine
        .with_writer(|conn| {
            approval_ops::insert_request(conn, "default", "hash", "agent", "L3 review", &now)
        })
        .await
        .unwrap();

    let first = engine
        .with_writer(|conn| {
            approval_ops::decide_request(conn, "default", queue_id, ApprovalStatus::Approved, "ok", &now)
        })
        .await
        .unwrap();
    let second = engine
        .with_writer(|conn| {
            approval_ops::decide_request(conn, "default", queue_id, ApprovalStatus::Rejected, "no", &now)
        })
        .await
        .unwrap();
    assert!(first);
    assert!(!second);

    let stored = engine
        .with_reader(|conn| approval_ops::get_request(conn, "default", queue_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ApprovalStatus::Approved);
    assert!(stored.decided_at.is_some());
}

#[tokio::test]
async fn sla_escalation_is_stamped_once_and_only_while_pending() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = fmt_ts(&Utc::now());
    let (first, second, decided, after_decision, completed) = engine
        .with_writer(|conn| {
            let a = approval_ops::insert_request(conn, "default", "h1", "agent", "L3 review", &now)?;
            let b = approval_ops::insert_request(conn, "default", "h2", "agent", "L3 review", &now)?;
            approval_ops::insert_request(conn, "other", "h3", "agent", "L3 review", &now)?;
            let first = approval_ops::mark_sla_escalated(conn, "default", a, &now)?;
            let second = approval_ops::mark_sla_escalated(conn, "default", a, &now)?;
            let decided =
                approval_ops::decide_request(conn, "default", b, ApprovalStatus::Rejected, "no", &now)?;
            let after_decision = approval_ops::mark_sla_escalated(conn, "default", b, &now)?;
            let completed = approval_ops::count_decided(conn, "default")?;
            Ok((first, second, decided, after_decision, completed))
        })
        .await
        .unwrap();
    assert!(first);
    assert!(!second);
    assert!(decided);
    assert!(!after_decision);
    assert_eq!(completed, 1);
}

#[tokio::test]
async fn calibration_window_is_newest_first_and_scoped() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = fmt_ts(&Utc::now());
    engine
        .with_writer(|conn| {
            calibration_ops::insert_prediction(conn, "default", "a", 0.9, true, 0.01, &now)?;
            calibration_ops::insert_prediction(conn, "default", "a", 0.8, false, 0.64, &now)?;
            calibration_ops::insert_prediction(conn, "default", "a", 0.6, true, 0.16, &now)?;
            calibration_ops::insert_prediction(conn, "other", "a", 1.0, false, 1.0, &now)?;
            Ok(())
        })
        .await
        .unwrap();

    let (recent, totals, empty) = engine
        .with_reader(|conn| {
            Ok((
                calibration_ops::recent_contributions(conn, "default", "a", 2)?,
                calibration_ops::totals(conn, "default", "a")?,
                calibration_ops::totals(conn, "default", "nobody")?,
            ))
        })
        .await
        .unwrap();
    assert_eq!(recent, vec![0.16, 0.64]);
    assert_eq!(totals.count, 3);
    assert!((totals.accuracy.unwrap() - 2.0 / 3.0).abs() < 1e-9);
    assert!((totals.average_confidence.unwrap() - 0.7666666666666667).abs() < 1e-9);
    assert_eq!(empty.count, 0);
    assert!(empty.accuracy.is_none());
}

#[tokio::test]
async fn calibration_rejects_confidence_outside_unit_range() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = fmt_ts(&Utc::now());
    let result = engine
        .with_writer(|conn| calibration_ops::insert_prediction(conn, "default", "a", 1.5, true, 0.25, &now))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn system_state_upserts() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = fmt_ts(&Utc::now());
    engine
        .with_writer(|conn| {
            state_ops::set_integrity_halt(conn, "default", Some("hash mismatch at 3"), &now)?;
            state_ops::ensure_state(conn, "default", OperatingMode::Safe, &now)?;
            Ok(())
        })
        .await
        .unwrap();

    let state = engine
        .with_reader(|conn| state_ops::get_state(conn, "default"))
        .await
        .unwrap()
        .unwrap();
    // ensure_state leaves an existing row alone.
    assert_eq!(state.mode, OperatingMode::Normal);
    assert_eq!(state.integrity_halt.as_deref(), Some("hash mismatch at 3"));

    engine
        .with_writer(|conn| {
            state_ops::set_mode(conn, "default", OperatingMode::Lean, "budget", &now)?;
            state_ops::set_integrity_halt(conn, "default", None, &now)
        })
        .await
        .unwrap();
    let state = engine
        .with_reader(|conn| state_ops::get_state(conn, "default"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.mode, OperatingMode::Lean);
    assert!(state.integrity_halt.is_none());
}

// ── ST-06: transactions and persistence ──

#[tokio::test]
async fn failed_transaction_rolls_back() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let result: Result<(), WardenError> = engine
        .with_writer(|conn| {
            immediate_transaction(conn, |conn| {
                agent_ops::insert_agent(conn, &make_agent("rollback", "default"))?;
                Err(StorageError::CorruptionDetected {
                    details: "forced".to_string(),
                }
                .into())
            })
        })
        .await;
    assert!(result.is_err());
    let agent = engine
        .with_reader(|conn| agent_ops::get_agent(conn, "default", "rollback"))
        .await
        .unwrap();
    assert!(agent.is_none());
}

#[tokio::test]
async fn file_backed_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warden.db");
    let config = warden_core::config::StorageConfig::default();

    {
        let engine = StorageEngine::open(&path, &config).unwrap();
        engine
            .with_writer(|conn| agent_ops::insert_agent(conn, &make_agent("persist", "default")))
            .await
            .unwrap();
    }

    let engine = StorageEngine::open(&path, &config).unwrap();
    let agent = engine
        .with_reader(|conn| agent_ops::get_agent(conn, "default", "persist"))
        .await
        .unwrap();
    assert!(agent.is_some());
    assert!(engine.pool().readers.is_some());
}
