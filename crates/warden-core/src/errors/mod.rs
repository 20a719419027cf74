//! Error handling for Warden.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod ledger_error;
pub mod policy_error;
pub mod storage_error;
pub mod trust_error;
pub mod verification_error;
pub mod warden_error;

pub use config_error::ConfigError;
pub use error_code::WardenErrorCode;
pub use ledger_error::LedgerError;
pub use policy_error::PolicyError;
pub use storage_error::StorageError;
pub use trust_error::TrustError;
pub use verification_error::VerificationError;
pub use warden_error::{WardenError, WardenResult};
