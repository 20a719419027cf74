/// Source of uniform samples in `[0, 1)`. Injected so sampling decisions
/// are reproducible in tests.
pub trait ISampler: Send + Sync {
    fn sample(&self) -> f64;
}
