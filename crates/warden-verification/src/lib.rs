//! # warden-verification
//!
//! The Sentinel pipeline: classify an artifact's risk grade, run the checks
//! that grade calls for, consult external formal verifiers at L3 (falling
//! back to heuristics), and resolve a single verdict.
//!
//! Verification is stateless apart from degradation tracking, so any number
//! of audits may run in parallel on one [`SentinelPipeline`].

pub mod checks;
pub mod external;
pub mod pipeline;
pub mod risk;
pub mod verdict;

pub use external::{DispatchOutcome, VerifierDispatch};
pub use pipeline::{artifact_id, AuditOutcome, SentinelPipeline};
pub use risk::{RiskCategory, RiskClassification, RiskClassifier};
pub use verdict::resolve_verdict;
