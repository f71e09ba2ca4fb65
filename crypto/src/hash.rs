//! Blake2b hashing for transactions and job payloads.
//!
//! Every digest that leaves this module is domain-separated: a fixed tag is
//! hashed ahead of the data so a transaction hash can never collide with a
//! job digest computed over the same bytes.

use atlas_types::TxHash;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

const TX_DOMAIN: &[u8] = b"atlas.tx.v1";
const JOB_DOMAIN: &[u8] = b"atlas.job.v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash the canonical serialization of a transaction to produce its `TxHash`.
pub fn hash_transaction(canonical: &[u8]) -> TxHash {
    TxHash::new(blake2b_256_multi(&[TX_DOMAIN, canonical]))
}

/// Digest of a compute job's canonical payload.
pub fn hash_job_payload(canonical: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[JOB_DOMAIN, canonical])
}
