//! Default signing collaborator.

use warden_core::errors::WardenResult;
use warden_core::traits::ISigner;

const SIGNATURE_PREFIX: &str = "sig_";

/// Keyless digest signer: `sig_` + first 16 hex chars of `blake3(identity ∥ bytes)`.
///
/// It binds a signature to its signer identity but offers no secrecy; a
/// deployment that needs real signatures plugs in its own [`ISigner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestSigner;

impl DigestSigner {
    fn digest(identity: &str, bytes: &[u8]) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(identity.as_bytes());
        hasher.update(bytes);
        let hex = hasher.finalize().to_hex();
        format!("{SIGNATURE_PREFIX}{}", &hex.as_str()[..16])
    }
}

impl ISigner for DigestSigner {
    fn sign(&self, identity: &str, bytes: &[u8]) -> WardenResult<String> {
        Ok(Self::digest(identity, bytes))
    }

    fn verify(&self, identity: &str, bytes: &[u8], signature: &str) -> bool {
        Self::digest(identity, bytes) == signature
    }
}
