//! Degradation tracking for components running on a fallback path.

pub mod tracker;

pub use tracker::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation, DEFAULT_HISTORY};
