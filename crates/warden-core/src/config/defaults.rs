// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "warden.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Ledger ---
pub const DEFAULT_LEDGER_QUERY_LIMIT: usize = 50;
pub const DEFAULT_VERIFY_ON_OPEN: bool = false;

// --- Verification ---
pub const DEFAULT_COMPLEXITY_CRITICAL: u32 = 20;
pub const DEFAULT_COMPLEXITY_ADVISORY: u32 = 10;
pub const DEFAULT_MAX_CITATION_DEPTH: u32 = 2;
pub const DEFAULT_QUOTE_MIN_LENGTH: usize = 10;
pub const DEFAULT_QUOTE_CONTEXT_MIN_CHARS: usize = 50;
pub const DEFAULT_QUOTE_CONTEXT_WINDOW: usize = 200;
pub const DEFAULT_VERIFIER_TIMEOUT_MS: u64 = 30_000;

// --- Trust ---
pub const DEFAULT_BOOTSTRAP_SCORE: f64 = 0.4;
pub const DEFAULT_LAMBDA_HIGH_RISK: f64 = 0.94;
pub const DEFAULT_LAMBDA_LOW_RISK: f64 = 0.97;
pub const DEFAULT_KBT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_IBT_THRESHOLD: f64 = 0.8;
pub const DEFAULT_VIOLATION_DROP: f64 = 0.1;
pub const DEFAULT_NEUTRAL_BASELINE: f64 = 0.4;
pub const DEFAULT_DECAY_RATE: f64 = 0.01;
pub const DEFAULT_DECAY_PERIOD_DAYS: f64 = 30.0;
pub const DEFAULT_MIN_DECAY_CHANGE: f64 = 0.0001;
pub const DEFAULT_PENALTY_SCHEMA_VIOLATION: f64 = 0.005;
pub const DEFAULT_PENALTY_API_MISUSE: f64 = 0.005;
pub const DEFAULT_PENALTY_STALE_CITATION: f64 = 0.010;
pub const DEFAULT_DAILY_PENALTY_CAP: f64 = 0.020;
pub const DEFAULT_PROBATION_FLOOR: f64 = 0.35;
pub const DEFAULT_PROBATION_MIN_VERIFICATIONS: u32 = 5;
pub const DEFAULT_PROBATION_DAYS: i64 = 30;
pub const DEFAULT_TRANSITIVE_DAMPING: f64 = 0.5;
pub const DEFAULT_MAX_HOPS: usize = 3;
pub const DEFAULT_ANCHOR_DAMPING: f64 = 0.85;
pub const DEFAULT_ANCHOR_ROLES: &[&str] = &["judge", "overseer", "sentinel"];
pub const DEFAULT_COOLING_OFF_HONEST_HOURS: i64 = 24;
pub const DEFAULT_COOLING_OFF_MALICIOUS_HOURS: i64 = 48;
pub const DEFAULT_PENALTY_MISCALIBRATION: f64 = 0.010;
pub const DEFAULT_CALIBRATION_WINDOW: usize = 100;
pub const DEFAULT_HONEST_ERROR_BRIER: f64 = 0.2;

// --- Credibility ---
pub const DEFAULT_SCI_REJECT_THRESHOLD: f64 = 35.0;
pub const DEFAULT_SCI_L1_TO_L2_THRESHOLD: f64 = 60.0;
pub const DEFAULT_SCI_L2_TO_L3_THRESHOLD: f64 = 40.0;
pub const DEFAULT_SCI_SUCCESS_DELTA: f64 = 2.0;
pub const DEFAULT_SCI_FAILURE_DELTA: f64 = 10.0;
pub const DEFAULT_LOW_CREDIBILITY_THRESHOLD: f64 = 50.0;

// --- Quarantine ---
pub const DEFAULT_HONEST_ERROR_HOURS: i64 = 0;
pub const DEFAULT_MANIPULATION_HOURS: i64 = 48;

// --- Approval ---
pub const DEFAULT_L3_SLA_HOURS: i64 = 24;
pub const DEFAULT_SLA_CRITICAL_AFTER_HOURS: i64 = 12;

// --- Mode ---
pub const DEFAULT_LEAN_SAMPLE_RATE: f64 = 0.10;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
