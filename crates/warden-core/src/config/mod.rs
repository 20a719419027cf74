//! Configuration system for Warden.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod approval_config;
pub mod credibility_config;
pub mod defaults;
pub mod ledger_config;
pub mod mode_config;
pub mod storage_config;
pub mod trust_config;
pub mod verification_config;
pub mod warden_config;

pub use approval_config::ApprovalConfig;
pub use credibility_config::{CredibilityConfig, QuarantineConfig};
pub use ledger_config::LedgerConfig;
pub use mode_config::{ModeConfig, ObservabilityConfig};
pub use storage_config::StorageConfig;
pub use trust_config::TrustConfig;
pub use verification_config::VerificationConfig;
pub use warden_config::{CliOverrides, WardenConfig};
