//! Mode gating.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use warden_core::config::ModeConfig;
use warden_core::models::{OperatingMode, RiskGrade};
use warden_core::traits::ISampler;

use crate::sampler::RandomSampler;
use crate::stats::{Counters, ModeStats};

/// Whether to verify now, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeDecision {
    pub verify: bool,
    pub reason: String,
}

impl ModeDecision {
    fn verify(reason: impl Into<String>) -> Self {
        Self {
            verify: true,
            reason: reason.into(),
        }
    }

    fn defer(reason: impl Into<String>) -> Self {
        Self {
            verify: false,
            reason: reason.into(),
        }
    }
}

/// Holds the active mode. The mode is injected, never read from globals,
/// and changed only through [`set_mode`](Self::set_mode).
pub struct ModeEnforcer {
    mode: RwLock<OperatingMode>,
    sampler: Arc<dyn ISampler>,
    config: ModeConfig,
    counters: Counters,
}

impl ModeEnforcer {
    pub fn new(mode: OperatingMode, sampler: Arc<dyn ISampler>, config: ModeConfig) -> Self {
        Self {
            mode: RwLock::new(mode),
            sampler,
            config,
            counters: Counters::default(),
        }
    }

    /// Enforcer starting in `config.initial_mode` with a [`RandomSampler`].
    pub fn from_config(config: ModeConfig) -> Self {
        Self::new(config.initial_mode, Arc::new(RandomSampler), config)
    }

    pub fn mode(&self) -> OperatingMode {
        *self.mode.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Switch mode and return the previous one. Counters carry over.
    pub fn set_mode(&self, mode: OperatingMode) -> OperatingMode {
        let mut current = self.mode.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *current, mode)
    }

    /// Decide for one artifact and count the decision.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use warden_core::config::ModeConfig;
    /// use warden_core::models::{OperatingMode, RiskGrade};
    /// use warden_mode::{FixedSampler, ModeEnforcer};
    ///
    /// let gate = ModeEnforcer::new(OperatingMode::Safe, Arc::new(FixedSampler(0.0)), ModeConfig::default());
    /// assert!(!gate.should_verify(RiskGrade::L2).verify);
    /// assert!(gate.should_verify(RiskGrade::L3).verify);
    /// ```
    pub fn should_verify(&self, grade: RiskGrade) -> ModeDecision {
        let mode = self.mode();
        let decision = self.decide(mode, grade);
        self.counters.record(grade, decision.verify);
        debug!(mode = %mode, grade = %grade, verify = decision.verify, reason = %decision.reason, "mode decision");
        decision
    }

    fn decide(&self, mode: OperatingMode, grade: RiskGrade) -> ModeDecision {
        if grade == RiskGrade::L3 {
            return ModeDecision::verify(format!("L3 is always verified ({mode})"));
        }
        match (mode, grade) {
            (OperatingMode::Normal, _) => ModeDecision::verify("NORMAL mode verifies every grade"),
            (OperatingMode::Lean, RiskGrade::L1) => {
                let rate = self.config.lean_sample_rate;
                let draw = self.sampler.sample();
                if draw < rate {
                    ModeDecision::verify(format!("LEAN sampled L1 ({draw:.3} < {rate:.2})"))
                } else {
                    ModeDecision::defer(format!("LEAN skipped L1 outside the {:.0}% sample", rate * 100.0))
                }
            }
            (OperatingMode::Surge, RiskGrade::L1) => ModeDecision::defer("SURGE defers L1"),
            (OperatingMode::Lean | OperatingMode::Surge, _) => {
                ModeDecision::verify(format!("{mode} fully verifies {grade}"))
            }
            (OperatingMode::Safe, _) => {
                ModeDecision::defer(format!("SAFE suspends {grade}; only L3 is verified"))
            }
        }
    }

    pub fn mode_stats(&self) -> ModeStats {
        self.counters.snapshot(self.mode())
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }
}
