//! # warden-ledger
//!
//! The append-only, hash-chained ledger. Every governance decision is recorded
//! here, and the ledger is the single source of ordering truth.
//!
//! `entry_hash = blake3(timestamp ∥ signer ∥ canonical_payload ∥ prev_hash)`,
//! with the first entry of each workspace chained to [`GENESIS_HASH`].

pub mod canonical;
pub mod hash;
pub mod ledger;
pub mod query;
pub mod signer;

pub use canonical::{canonical_json, to_canonical};
pub use hash::compute_entry_hash;
pub use ledger::{ChainReport, Ledger};
pub use query::LedgerQuery;
pub use signer::DigestSigner;
pub use warden_core::constants::GENESIS_HASH;
