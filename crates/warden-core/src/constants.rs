/// Warden system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `prev_hash` of the first entry in every ledger chain.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Workspace used when none is configured.
pub const DEFAULT_WORKSPACE_ID: &str = "default";

/// Signer identity used for entries written by the verification pipeline.
pub const SENTINEL_IDENTITY: &str = "did:warden:sentinel";

/// Signer identity used for trust and quarantine bookkeeping.
pub const JUDGE_IDENTITY: &str = "did:warden:judge";

/// Signer identity used for human approval decisions.
pub const OVERSEER_IDENTITY: &str = "did:warden:overseer";

/// Placeholder substituted for detected PII.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";
