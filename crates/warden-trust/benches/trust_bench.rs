//! Criterion benchmarks for the trust engine.
//!
//! - EWMA update
//! - normalization + anchor damping over 1K agents

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use warden_core::config::TrustConfig;
use warden_core::models::RiskContext;
use warden_trust::{anchor_damp, ewma_update, normalize_l1};

fn bench_ewma(c: &mut Criterion) {
    let config = TrustConfig::default();
    c.bench_function("ewma_update", |b| {
        b.iter(|| ewma_update(black_box(0.62), black_box(1.0), RiskContext::HighRisk, &config))
    });
}

fn bench_normalization(c: &mut Criterion) {
    let scores: Vec<f64> = (0..1_000).map(|i| (i % 100) as f64 / 100.0).collect();
    let anchors: Vec<f64> = (0..1_000).map(|i| if i % 50 == 0 { 1.0 } else { 0.0 }).collect();
    c.bench_function("normalize_and_damp_1k", |b| {
        b.iter(|| anchor_damp(&normalize_l1(&scores), &normalize_l1(&anchors), 0.85))
    });
}

criterion_group!(benches, bench_ewma, bench_normalization);
criterion_main!(benches);
