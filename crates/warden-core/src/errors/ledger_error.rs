//! Ledger errors. Integrity failures are the only fatal class in the system.

use super::error_code::{self, WardenErrorCode};

/// Errors raised by the hash-chained ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Replay produced a hash or link that differs from what is stored.
    #[error("ledger integrity violation at entry {entry_id}: {details}")]
    IntegrityViolation { entry_id: i64, details: String },

    /// A stored signature did not verify against its signer identity.
    #[error("signature verification failed for entry {entry_id} (signer {signer})")]
    SignatureInvalid { entry_id: i64, signer: String },

    /// Writes are blocked until an operator clears the integrity halt.
    #[error("ledger halted after integrity failure: {reason}")]
    Halted { reason: String },

    /// The payload could not be encoded canonically.
    #[error("payload encoding failed: {0}")]
    PayloadEncoding(String),
}

impl LedgerError {
    /// Integrity and signature failures halt the system; nothing else does.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IntegrityViolation { .. } | Self::SignatureInvalid { .. } | Self::Halted { .. }
        )
    }
}

impl WardenErrorCode for LedgerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::IntegrityViolation { .. } => error_code::INTEGRITY_VIOLATION,
            Self::SignatureInvalid { .. } => error_code::SIGNATURE_INVALID,
            Self::Halted { .. } => error_code::LEDGER_HALTED,
            Self::PayloadEncoding(_) => error_code::PAYLOAD_ENCODING,
        }
    }
}
