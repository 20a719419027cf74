//! WardenErrorCode trait: machine-readable reasons for every rejection.

/// Every error enum implements this to expose a stable reason code that
/// callers (dashboards, CLIs) can branch on without parsing messages.
pub trait WardenErrorCode {
    /// Returns the reason code string (e.g., "AGENT_QUARANTINED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn reason_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Storage
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const DB_CORRUPT: &str = "DB_CORRUPT";
pub const APPEND_ONLY_VIOLATION: &str = "APPEND_ONLY_VIOLATION";

// Ledger
pub const INTEGRITY_VIOLATION: &str = "INTEGRITY_VIOLATION";
pub const SIGNATURE_INVALID: &str = "SIGNATURE_INVALID";
pub const LEDGER_HALTED: &str = "LEDGER_HALTED";
pub const PAYLOAD_ENCODING: &str = "PAYLOAD_ENCODING";

// Input
pub const MALFORMED_ARTIFACT: &str = "MALFORMED_ARTIFACT";
pub const AGENT_NOT_FOUND: &str = "AGENT_NOT_FOUND";
pub const AGENT_ALREADY_REGISTERED: &str = "AGENT_ALREADY_REGISTERED";
pub const INVALID_SCORE: &str = "INVALID_SCORE";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const APPROVAL_NOT_FOUND: &str = "APPROVAL_NOT_FOUND";

// Degraded dependencies
pub const VERIFIER_UNAVAILABLE: &str = "VERIFIER_UNAVAILABLE";
pub const VERIFIER_TIMEOUT: &str = "VERIFIER_TIMEOUT";
pub const PARSE_FAILED: &str = "PARSE_FAILED";

// Policy
pub const AGENT_QUARANTINED: &str = "AGENT_QUARANTINED";
pub const SOURCE_REJECTED: &str = "SOURCE_REJECTED";
pub const APPROVAL_ALREADY_DECIDED: &str = "APPROVAL_ALREADY_DECIDED";

// Config
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
