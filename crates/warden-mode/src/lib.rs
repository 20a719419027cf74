//! # warden-mode
//!
//! The mode enforcer: given the current [`OperatingMode`], decides whether
//! an artifact of a given risk grade is verified now or deferred. L3 is
//! verified in every mode.
//!
//! [`OperatingMode`]: warden_core::models::OperatingMode

pub mod enforcer;
pub mod sampler;
pub mod stats;

pub use enforcer::{ModeDecision, ModeEnforcer};
pub use sampler::{FixedSampler, RandomSampler};
pub use stats::{GradeCounts, ModeStats};
