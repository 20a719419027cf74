//! # warden-credibility
//!
//! Per-source trust (the Source Credibility Index) and per-agent quarantine
//! windows. The first can raise an artifact's risk grade; the second blocks
//! an agent for a bounded time.

pub mod quarantine;
pub mod sci;
pub mod tiers;

pub use quarantine::{QuarantineManager, QuarantineStatusReport};
pub use sci::SourceCredibilityIndex;
pub use tiers::{classify_tier, domain_of, source_id};
