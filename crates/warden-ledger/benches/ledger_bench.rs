//! Criterion benchmarks for warden-ledger.
//!
//! - entry hash over a typical verdict payload
//! - canonical encoding of a nested payload
//! - replay of a 1K-entry chain

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

use warden_core::models::{EventType, RiskGrade};
use warden_ledger::{canonical_json, compute_entry_hash, Ledger, GENESIS_HASH};
use warden_storage::StorageEngine;

fn verdict_payload(i: usize) -> serde_json::Value {
    json!({
        "artifact_id": format!("artifact-{i}"),
        "verdict": "PASS",
        "risk_grade": "L2",
        "findings": [{"category": "COMPLEXITY", "severity": "ADVISORY", "line": 12}],
        "latency_ms": 4,
    })
}

fn bench_hash(c: &mut Criterion) {
    let payload = canonical_json(&verdict_payload(0));
    c.bench_function("compute_entry_hash", |b| {
        b.iter(|| {
            compute_entry_hash(
                "2026-03-01T12:00:00.000000Z",
                "did:warden:sentinel",
                &payload,
                GENESIS_HASH,
            )
        })
    });
}

fn bench_canonical(c: &mut Criterion) {
    let payload = verdict_payload(7);
    c.bench_function("canonical_json", |b| b.iter(|| canonical_json(&payload)));
}

fn bench_replay(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let ledger = Ledger::with_default_signer(Arc::new(
        StorageEngine::open_in_memory().expect("storage"),
    ));
    rt.block_on(async {
        for i in 0..1_000 {
            ledger
                .append("did:warden:sentinel", EventType::AuditPass, RiskGrade::L2, &verdict_payload(i))
                .await
                .expect("append");
        }
    });
    c.bench_function("replay_1k", |b| {
        b.iter(|| rt.block_on(ledger.replay()).expect("replay"))
    });
}

criterion_group!(benches, bench_hash, bench_canonical, bench_replay);
criterion_main!(benches);
