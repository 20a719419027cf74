//! [`ISampler`] implementations.

use rand::Rng;

use warden_core::traits::ISampler;

/// Thread-local RNG. The production sampler.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl ISampler for RandomSampler {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same value. For tests and replay.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub f64);

impl ISampler for FixedSampler {
    fn sample(&self) -> f64 {
        self.0
    }
}
