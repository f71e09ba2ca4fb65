//! Fundamental types for the Atlas energy ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! transaction hashes, node identifiers, token amounts, timestamps, keys and the
//! ledger policy parameters.

pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod node_id;
pub mod params;
pub mod time;

pub use amount::TokenAmount;
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use node_id::NodeId;
pub use params::LedgerParams;
pub use time::{Clock, SystemClock, Timestamp};
