//! Fallback bookkeeping for the verification path.
//!
//! Components are free-form keys such as `external_verifier:cbmc` or
//! `sentinel`. A component is degraded while it has at least one
//! unrecovered event; a single success recovers all of them.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracing_setup::events;

/// Events kept before the oldest recovered ones are dropped.
pub const DEFAULT_HISTORY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    /// What went wrong, e.g. `TIMEOUT after 30000ms`.
    pub failure_mode: String,
    /// What ran instead.
    pub fallback: String,
    pub occurred_at: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn now(component: &str, failure_mode: &str, fallback: &str) -> Self {
        Self {
            component: component.to_string(),
            failure_mode: failure_mode.to_string(),
            fallback: fallback.to_string(),
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

impl TrackedDegradation {
    fn is_active_for(&self, component: &str) -> bool {
        self.recovery_status == RecoveryStatus::Active && self.event.component == component
    }
}

#[derive(Debug, Clone)]
pub struct DegradationTracker {
    history: VecDeque<TrackedDegradation>,
    capacity: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a fallback. When the history is full the oldest recovered
    /// event is evicted; active events are only dropped if nothing else is.
    pub fn record(&mut self, event: DegradationEvent) {
        events::degradation_triggered(&event.component, &event.failure_mode, &event.fallback);
        if self.history.len() >= self.capacity {
            let evict = self
                .history
                .iter()
                .position(|t| t.recovery_status == RecoveryStatus::Recovered)
                .unwrap_or(0);
            self.history.remove(evict);
        }
        self.history.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active event of `component` recovered. Returns how many
    /// were closed.
    pub fn recover(&mut self, component: &str) -> usize {
        let now = Utc::now();
        let mut closed = 0;
        for tracked in self.history.iter_mut().filter(|t| t.is_active_for(component)) {
            tracked.recovery_status = RecoveryStatus::Recovered;
            tracked.recovered_at = Some(now);
            closed += 1;
        }
        closed
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.history.iter().any(|t| t.is_active_for(component))
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<TrackedDegradation> {
        self.history.iter().cloned().collect()
    }

    pub fn active(&self) -> Vec<&TrackedDegradation> {
        self.history
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn failures_since(&self, component: &str, since: DateTime<Utc>) -> usize {
        self.history
            .iter()
            .filter(|t| t.event.component == component && t.event.occurred_at >= since)
            .count()
    }
}
