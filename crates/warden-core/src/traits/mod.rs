//! Seams to external collaborators.

pub mod external_verifier;
pub mod sampler;
pub mod sanitizer;
pub mod signer;

pub use external_verifier::{ExternalVerdict, IExternalVerifier, VerificationKind, VerifierStatus};
pub use sampler::ISampler;
pub use sanitizer::{ISanitizer, Redaction, SanitizedText};
pub use signer::ISigner;
