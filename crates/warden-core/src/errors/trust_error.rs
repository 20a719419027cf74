//! Error types for trust scoring and the agent registry.

use super::error_code::{self, WardenErrorCode};

/// Errors specific to trust operations.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    /// The specified agent was not found in the registry.
    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// An agent with this ID is already registered.
    #[error("agent already registered: {0}")]
    AgentAlreadyRegistered(String),

    /// A score or outcome fell outside [0, 1].
    #[error("invalid {field}: {value} is outside [0, 1]")]
    InvalidScore {
        /// Which input was out of range.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Trust vectors passed to a blend had different lengths.
    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the computed vector.
        left: usize,
        /// Length of the anchor vector.
        right: usize,
    },
}

impl WardenErrorCode for TrustError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AgentNotFound(_) => error_code::AGENT_NOT_FOUND,
            Self::AgentAlreadyRegistered(_) => error_code::AGENT_ALREADY_REGISTERED,
            Self::InvalidScore { .. } => error_code::INVALID_SCORE,
            Self::LengthMismatch { .. } => error_code::INVALID_INPUT,
        }
    }
}
