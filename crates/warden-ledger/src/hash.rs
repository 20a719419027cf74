//! Entry hashing.

/// blake3 over `timestamp`, `signer`, `payload` and `prev_hash`, each
/// preceded by its byte length as a little-endian u64, hex encoded.
///
/// `payload` must be the canonical text exactly as stored.
///
/// ```
/// use warden_ledger::{compute_entry_hash, GENESIS_HASH};
///
/// let a = compute_entry_hash("2026-01-01T00:00:00.000000Z", "did:warden:sentinel", "{}", GENESIS_HASH);
/// let b = compute_entry_hash("2026-01-01T00:00:00.000000Z", "did:warden:sentinel", "{}", GENESIS_HASH);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn compute_entry_hash(timestamp: &str, signer: &str, payload: &str, prev_hash: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    for field in [timestamp, signer, payload, prev_hash] {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
