//! Node wallet: an Ed25519 key pair plus a short address.
//!
//! The address is the first 16 hex characters of the Blake2b-256 digest of the
//! public key. It is informational only; ledger balances are keyed by `NodeId`.
//!
//! Wallet signatures cover a domain tag followed by the message, so a
//! signature over a transaction's unsigned form cannot be replayed as a
//! signature over any other Ed25519-signed bytes.

use atlas_types::{KeyPair, PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use crate::hash::blake2b_256;
use crate::keys::{generate_keypair, keypair_from_seed};

/// Address length in hex characters.
pub const ADDRESS_LEN: usize = 16;

const SIGNATURE_DOMAIN: &[u8] = b"atlas.sig.v1";

pub struct NodeWallet {
    keys: KeyPair,
    address: String,
}

impl NodeWallet {
    /// Create a wallet with a freshly generated key pair.
    pub fn generate() -> Self {
        Self::from_keypair(generate_keypair())
    }

    /// Restore a wallet from its 32-byte private key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_keypair(keypair_from_seed(seed))
    }

    pub fn from_keypair(keys: KeyPair) -> Self {
        let address = derive_address(&keys.public);
        Self { keys, address }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.keys.private
    }

    /// Domain-tagged Ed25519 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let key = SigningKey::from_bytes(&self.keys.private.0);
        Signature(key.sign(&tagged(message)).to_bytes())
    }
}

/// Check a wallet signature over `message` against `public`.
///
/// Malformed keys and signatures verify as `false`.
pub fn verify(public: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public.as_bytes()) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    key.verify_strict(&tagged(message), &signature).is_ok()
}

/// Derive the short wallet address for a public key.
pub fn derive_address(public: &PublicKey) -> String {
    let mut address = hex::encode(blake2b_256(public.as_bytes()));
    address.truncate(ADDRESS_LEN);
    address
}

fn tagged(message: &[u8]) -> Vec<u8> {
    [SIGNATURE_DOMAIN, message].concat()
}
