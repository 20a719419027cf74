//! # warden-privacy
//!
//! Secret/credential detection and PII redaction. Pattern tables compile
//! lazily; a pattern that fails to compile matches nothing and is reported by
//! [`PrivacyEngine::failed_patterns`].

pub mod engine;
pub mod patterns;

pub use engine::PrivacyEngine;
pub use patterns::PatternMatch;
