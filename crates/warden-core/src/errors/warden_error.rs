use super::error_code::WardenErrorCode;
use super::{
    ConfigError, LedgerError, PolicyError, StorageError, TrustError, VerificationError,
};
use crate::models::RiskGrade;

/// Top-level error. Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("trust error: {0}")]
    Trust(#[from] TrustError),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WardenError {
    /// True only for integrity failures. Every other class is logged and
    /// the system continues.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Ledger(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Risk grade carried by a policy rejection.
    pub fn risk_grade(&self) -> Option<RiskGrade> {
        match self {
            Self::Policy(e) => e.risk_grade(),
            _ => None,
        }
    }
}

impl WardenErrorCode for WardenError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Verification(e) => e.error_code(),
            Self::Trust(e) => e.error_code(),
            Self::Policy(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Serialization(_) => super::error_code::PAYLOAD_ENCODING,
        }
    }
}

/// Convenience alias used across the workspace.
pub type WardenResult<T> = Result<T, WardenError>;
