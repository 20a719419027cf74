use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum CalibrationStatus {
        Ok => "OK",
        Overconfident => "OVERCONFIDENT",
    }
}

/// How well an agent's stated confidence matches what actually happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub agent_id: String,
    /// Mean squared error of confidence against outcome over the rolling
    /// window. 0 is perfect, 0.25 is a coin flip. None before any prediction.
    pub brier_score: Option<f64>,
    pub prediction_count: u64,
    /// Share of predictions that were correct, over all history.
    pub accuracy: Option<f64>,
    pub average_confidence: Option<f64>,
    pub status: CalibrationStatus,
}

impl CalibrationReport {
    pub fn honest_error_triggered(&self) -> bool {
        self.status == CalibrationStatus::Overconfident
    }
}
