//! # warden-governance
//!
//! [`GovernanceEngine`] is the entry point an agent submits work through.
//! One submission passes the quarantine gate, is audited, has its cited
//! sources checked, is gated by the operating mode, lands in the ledger,
//! is queued for human approval when it is L3, and finally moves the
//! submitting agent's trust. [`SlaMonitor`] watches the approval queue
//! for requests an overseer has left past their deadline.

pub mod approval;
pub mod engine;
pub mod sla;
pub mod submission;

pub use approval::{ApprovalDecision, ApprovalQueue};
pub use engine::GovernanceEngine;
pub use sla::SlaMonitor;
pub use submission::{Submission, SystemStatus};
