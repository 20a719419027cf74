//! # warden-observability
//!
//! Structured tracing initialisation, one event helper per governance event,
//! and tracking of degraded components (verifier fallbacks).

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::{events, init_tracing, init_tracing_with_filter};
