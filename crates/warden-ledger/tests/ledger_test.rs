//! Ledger tests: chaining, replay, tamper detection, integrity halt,
//! concurrent appends and the query surface.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use warden_core::errors::{LedgerError, WardenError};
use warden_core::models::{EventType, RiskGrade};
use warden_core::traits::ISigner;
use warden_ledger::{canonical_json, compute_entry_hash, DigestSigner, Ledger, LedgerQuery, GENESIS_HASH};
use warden_storage::StorageEngine;

const SENTINEL: &str = "did:warden:sentinel";

fn in_memory_ledger() -> Ledger {
    Ledger::with_default_signer(Arc::new(StorageEngine::open_in_memory().unwrap()))
}

async fn append_n(ledger: &Ledger, n: usize) {
    for i in 0..n {
        ledger
            .append(
                SENTINEL,
                EventType::AuditPass,
                RiskGrade::L2,
                &json!({ "artifact_id": format!("a-{i}"), "seq": i }),
            )
            .await
            .unwrap();
    }
}

/// Overwrite one stored payload, bypassing the append-only triggers.
async fn tamper_payload(ledger: &Ledger, entry_id: i64, payload: &str) {
    ledger
        .storage()
        .with_writer(|conn| {
            conn.execute_batch(
                "DROP TRIGGER ledger_entries_no_update; DROP TRIGGER ledger_entries_no_delete;",
            )
            .unwrap();
            conn.execute(
                "UPDATE ledger_entries SET payload = ?1 WHERE entry_id = ?2",
                rusqlite::params![payload, entry_id],
            )
            .unwrap();
            Ok(())
        })
        .await
        .unwrap();
}

// ── LG-01: chaining ──

#[tokio::test]
async fn first_entry_links_to_genesis_and_each_entry_links_to_its_predecessor() {
    let ledger = in_memory_ledger();
    let first = ledger
        .append(SENTINEL, EventType::AuditPass, RiskGrade::L1, &json!({"n": 1}))
        .await
        .unwrap();
    let second = ledger
        .append(SENTINEL, EventType::AuditFail, RiskGrade::L3, &json!({"n": 2}))
        .await
        .unwrap();

    assert_eq!(first.prev_hash, GENESIS_HASH);
    assert_eq!(second.prev_hash, first.entry_hash);
    assert_eq!(
        second.entry_hash,
        compute_entry_hash(&second.timestamp, SENTINEL, &second.payload, &first.entry_hash)
    );
    assert_eq!(ledger.tail_hash().await.unwrap(), second.entry_hash);
    assert!(DigestSigner.verify(SENTINEL, second.entry_hash.as_bytes(), &second.signature));
}

#[test]
fn shifting_bytes_between_fields_changes_the_hash() {
    let ts = "2026-03-01T12:00:00.000000Z";
    let joined = compute_entry_hash(ts, "did:warden:judge", "{}", GENESIS_HASH);
    let shifted = compute_entry_hash(ts, "did:warden:judge{", "}", GENESIS_HASH);
    assert_ne!(joined, shifted);
    let moved = compute_entry_hash(&format!("{ts}d"), "id:warden:judge", "{}", GENESIS_HASH);
    assert_ne!(joined, moved);
}

#[tokio::test]
async fn payload_is_stored_canonically() {
    let ledger = in_memory_ledger();
    let entry = ledger
        .append(SENTINEL, EventType::TrustUpdate, RiskGrade::L2, &json!({"z": 1, "a": {"c": 2, "b": 3}}))
        .await
        .unwrap();
    assert_eq!(entry.payload, r#"{"a":{"b":3,"c":2},"z":1}"#);
    assert_eq!(entry.payload_json().unwrap()["a"]["b"], 3);
}

// ── LG-02: replay ──

#[tokio::test]
async fn replay_of_untouched_chain_is_intact_and_idempotent() {
    let ledger = in_memory_ledger();
    append_n(&ledger, 5).await;

    let first = ledger.replay().await.unwrap();
    let second = ledger.replay().await.unwrap();
    assert!(first.is_intact());
    assert_eq!(first.entries_checked, 5);
    assert_eq!(first, second);
    assert_eq!(first.tail_hash, ledger.tail_hash().await.unwrap());
}

#[tokio::test]
async fn replay_is_order_sensitive() {
    let ledger = in_memory_ledger();
    append_n(&ledger, 3).await;
    let mut entries = ledger.query(&LedgerQuery::new().ascending()).await.unwrap();
    entries.swap(0, 1);
    let report = ledger.replay_entries(&entries);
    assert!(!report.is_intact());
    assert_eq!(report.broken.len(), 3);
}

#[tokio::test]
async fn empty_chain_verifies() {
    let ledger = in_memory_ledger();
    let report = ledger.verify_chain().await.unwrap();
    assert_eq!(report.entries_checked, 0);
    assert_eq!(report.tail_hash, GENESIS_HASH);
}

// ── LG-03: tamper detection and integrity halt ──

#[tokio::test]
async fn tampering_halts_writes_until_cleared() {
    let ledger = in_memory_ledger();
    append_n(&ledger, 4).await;
    tamper_payload(&ledger, 2, r#"{"artifact_id":"forged","seq":1}"#).await;

    let err = ledger.verify_chain().await.unwrap_err();
    match &err {
        WardenError::Ledger(LedgerError::IntegrityViolation { entry_id, .. }) => {
            assert_eq!(*entry_id, 2)
        }
        other => panic!("expected integrity violation, got {other:?}"),
    }
    assert!(err.is_fatal());
    assert!(ledger.halt_reason().await.unwrap().is_some());

    let blocked = ledger
        .append(SENTINEL, EventType::AuditPass, RiskGrade::L1, &json!({}))
        .await;
    assert!(matches!(
        blocked,
        Err(WardenError::Ledger(LedgerError::Halted { .. }))
    ));

    let cleared = ledger.clear_halt("operator-1").await.unwrap();
    assert_eq!(cleared.event_type, EventType::HaltCleared);
    assert_eq!(cleared.signer, "operator-1");
    assert!(cleared.payload_json().unwrap()["cleared"].is_string());
    assert!(ledger.halt_reason().await.unwrap().is_none());
    ledger
        .append(SENTINEL, EventType::AuditPass, RiskGrade::L1, &json!({}))
        .await
        .unwrap();

    // Clearing the halt repairs nothing.
    assert!(!ledger.replay().await.unwrap().is_intact());
}

#[tokio::test]
async fn forged_signature_is_reported() {
    let ledger = in_memory_ledger();
    append_n(&ledger, 2).await;
    ledger
        .storage()
        .with_writer(|conn| {
            conn.execute_batch("DROP TRIGGER ledger_entries_no_update;").unwrap();
            conn.execute("UPDATE ledger_entries SET signature = 'sig_forged' WHERE entry_id = 1", [])
                .unwrap();
            Ok(())
        })
        .await
        .unwrap();

    let report = ledger.replay().await.unwrap();
    assert!(report.broken.is_empty());
    assert_eq!(report.signature_failures, vec![1]);
    let err = ledger.verify_chain().await.unwrap_err();
    assert!(matches!(
        err,
        WardenError::Ledger(LedgerError::SignatureInvalid { entry_id: 1, .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_tampering_breaks_that_entry_and_every_later_one(
        len in 2usize..8,
        target_seed in 0usize..100,
        replacement in "[a-z]{1,12}",
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ledger = in_memory_ledger();
            append_n(&ledger, len).await;
            let target = (target_seed % len) as i64 + 1;
            let forged = canonical_json(&json!({ "artifact_id": replacement, "seq": -1 }));
            tamper_payload(&ledger, target, &forged).await;

            let report = ledger.replay().await.unwrap();
            let expected: Vec<i64> = (target..=len as i64).collect();
            assert_eq!(report.broken, expected);
            assert_eq!(report.first_broken(), Some(target));
        });
    }
}

// ── LG-04: concurrency ──

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_form_a_single_linear_chain() {
    let dir = tempfile::tempdir().unwrap();
    let config = warden_core::config::StorageConfig::default();
    let storage = Arc::new(StorageEngine::open(&dir.path().join("ledger.db"), &config).unwrap());
    let ledger = Arc::new(Ledger::with_default_signer(storage));

    let mut handles = Vec::new();
    for task in 0..8 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                ledger
                    .append(
                        SENTINEL,
                        EventType::TrustUpdate,
                        RiskGrade::L2,
                        &json!({ "task": task, "i": i }),
                    )
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(ledger.count().await.unwrap(), 80);
    let report = ledger.verify_chain().await.unwrap();
    assert!(report.is_intact());
    assert_eq!(report.entries_checked, 80);
}

// ── LG-05: query surface ──

#[tokio::test]
async fn query_surface_orders_descending_by_default() {
    let ledger = in_memory_ledger();
    append_n(&ledger, 3).await;
    ledger
        .append(SENTINEL, EventType::ModeChange, RiskGrade::L1, &json!({"to": "LEAN"}))
        .await
        .unwrap();

    let last_two = ledger.last_n(2).await.unwrap();
    assert_eq!(last_two.iter().map(|e| e.entry_id).collect::<Vec<_>>(), vec![4, 3]);

    let after = ledger.after(2).await.unwrap();
    assert_eq!(after.iter().map(|e| e.entry_id).collect::<Vec<_>>(), vec![4, 3]);

    let modes = ledger.by_event_type(EventType::ModeChange).await.unwrap();
    assert_eq!(modes.len(), 1);
    assert_eq!(modes[0].event_type, EventType::ModeChange);

    let ascending = ledger
        .query(&LedgerQuery::new().event_type(EventType::AuditPass).ascending().limit(2))
        .await
        .unwrap();
    assert_eq!(ascending.iter().map(|e| e.entry_id).collect::<Vec<_>>(), vec![1, 2]);

    assert!(ledger.get(99).await.unwrap().is_none());
}

#[tokio::test]
async fn workspaces_keep_independent_chains() {
    let alpha = Ledger::with_default_signer(Arc::new(StorageEngine::open_in_memory_for("alpha").unwrap()));
    append_n(&alpha, 2).await;
    let beta = Ledger::with_default_signer(Arc::new(StorageEngine::open_in_memory_for("beta").unwrap()));
    let entry = beta
        .append(SENTINEL, EventType::AuditPass, RiskGrade::L1, &json!({}))
        .await
        .unwrap();
    assert_eq!(entry.prev_hash, GENESIS_HASH);
    assert_eq!(alpha.count().await.unwrap(), 2);
}
