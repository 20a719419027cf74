use crate::errors::WardenResult;

/// Opaque signing capability. The ledger stores only the returned string.
pub trait ISigner: Send + Sync {
    /// Sign `bytes` as `identity`.
    fn sign(&self, identity: &str, bytes: &[u8]) -> WardenResult<String>;

    /// Check a signature previously produced for `identity`.
    fn verify(&self, identity: &str, bytes: &[u8], signature: &str) -> bool;
}
