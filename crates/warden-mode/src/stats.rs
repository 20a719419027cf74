//! Verified/skipped counters per grade.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use warden_core::models::{OperatingMode, RiskGrade};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeCounts {
    pub verified: u64,
    pub skipped: u64,
}

/// Snapshot returned by [`ModeEnforcer::mode_stats`](crate::ModeEnforcer::mode_stats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeStats {
    pub mode: OperatingMode,
    pub l1: GradeCounts,
    pub l2: GradeCounts,
    pub l3: GradeCounts,
}

impl ModeStats {
    pub fn for_grade(&self, grade: RiskGrade) -> GradeCounts {
        match grade {
            RiskGrade::L1 => self.l1,
            RiskGrade::L2 => self.l2,
            RiskGrade::L3 => self.l3,
        }
    }

    pub fn total_skipped(&self) -> u64 {
        self.l1.skipped + self.l2.skipped + self.l3.skipped
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    verified: [AtomicU64; 3],
    skipped: [AtomicU64; 3],
}

fn slot(grade: RiskGrade) -> usize {
    match grade {
        RiskGrade::L1 => 0,
        RiskGrade::L2 => 1,
        RiskGrade::L3 => 2,
    }
}

impl Counters {
    pub(crate) fn record(&self, grade: RiskGrade, verified: bool) {
        let counters = if verified { &self.verified } else { &self.skipped };
        counters[slot(grade)].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, mode: OperatingMode) -> ModeStats {
        let counts = |grade| {
            let i = slot(grade);
            GradeCounts {
                verified: self.verified[i].load(Ordering::Relaxed),
                skipped: self.skipped[i].load(Ordering::Relaxed),
            }
        };
        ModeStats {
            mode,
            l1: counts(RiskGrade::L1),
            l2: counts(RiskGrade::L2),
            l3: counts(RiskGrade::L3),
        }
    }

    pub(crate) fn reset(&self) {
        for counter in self.verified.iter().chain(self.skipped.iter()) {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
