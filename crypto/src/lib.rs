//! Cryptographic primitives for the Atlas ledger.
//!
//! - **Blake2b-256** for transaction hashes and compute job digests
//! - **Ed25519** for node wallets and optional transaction signatures
//!
//! Signatures are produced but admission does not verify them.

pub mod hash;
pub mod keys;
pub mod wallet;

pub use hash::{blake2b_256, blake2b_256_multi, hash_job_payload, hash_transaction};
pub use keys::{generate_keypair, keypair_from_seed};
pub use wallet::{derive_address, verify, NodeWallet};
