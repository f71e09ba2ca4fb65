//! Tangle transactions.
//!
//! A [`Transaction`] is an immutable record of a payload, two parent
//! references and the originating node. Its hash is derived from the
//! canonical serialization of every other field, so the only way to obtain a
//! `Transaction` is through a constructor that computes it. Decoding always
//! recomputes the hash; a stored hash is never trusted.

pub mod builder;
pub mod error;
pub mod payload;
pub mod validation;

pub use builder::TransactionBuilder;
pub use error::TransactionError;
pub use payload::Payload;
pub use validation::validate_transaction;

use atlas_crypto::hash_transaction;
use atlas_types::{NodeId, PublicKey, Signature, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct Transaction {
    hash: TxHash,
    payload: Payload,
    parent1: TxHash,
    parent2: TxHash,
    node_id: NodeId,
    timestamp: Timestamp,
    signature: Option<Signature>,
}

/// Field order here is the hashing order; keep it stable.
#[derive(Serialize)]
struct CanonicalFields<'a> {
    node_id: &'a NodeId,
    parent1: &'a TxHash,
    parent2: &'a TxHash,
    payload: &'a Payload,
    signature: Option<&'a Signature>,
    timestamp: Timestamp,
}

impl Transaction {
    pub fn new(
        payload: Payload,
        parent1: TxHash,
        parent2: TxHash,
        node_id: NodeId,
        timestamp: Timestamp,
        signature: Option<Signature>,
    ) -> Result<Self, TransactionError> {
        let canonical = canonical_bytes(
            &payload,
            &parent1,
            &parent2,
            &node_id,
            timestamp,
            signature.as_ref(),
        )?;
        Ok(Self {
            hash: hash_transaction(&canonical),
            payload,
            parent1,
            parent2,
            node_id,
            timestamp,
            signature,
        })
    }

    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn parent1(&self) -> &TxHash {
        &self.parent1
    }

    pub fn parent2(&self) -> &TxHash {
        &self.parent2
    }

    /// Both parents, in reference order.
    pub fn parents(&self) -> [TxHash; 2] {
        [self.parent1, self.parent2]
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_energy_contribution(&self) -> bool {
        self.payload.is_energy_contribution()
    }

    pub fn energy_kwh(&self) -> f64 {
        self.payload.energy_kwh()
    }

    /// Bytes a signer commits to: the canonical form with no signature.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        canonical_bytes(
            &self.payload,
            &self.parent1,
            &self.parent2,
            &self.node_id,
            self.timestamp,
            None,
        )
    }

    /// Whether the recorded signature was made by `public` over
    /// [`Transaction::signing_bytes`]. Unsigned transactions report `false`.
    ///
    /// Admission never calls this; it is an offline audit check.
    pub fn is_signed_by(&self, public: &PublicKey) -> Result<bool, TransactionError> {
        let Some(signature) = &self.signature else {
            return Ok(false);
        };
        Ok(atlas_crypto::verify(public, &self.signing_bytes()?, signature))
    }
}

pub(crate) fn canonical_bytes(
    payload: &Payload,
    parent1: &TxHash,
    parent2: &TxHash,
    node_id: &NodeId,
    timestamp: Timestamp,
    signature: Option<&Signature>,
) -> Result<Vec<u8>, TransactionError> {
    let fields = CanonicalFields {
        node_id,
        parent1,
        parent2,
        payload,
        signature,
        timestamp,
    };
    serde_json::to_vec(&fields).map_err(|e| TransactionError::Encoding(e.to_string()))
}

/// A transaction as it appears in persisted state.
///
/// `hash` is written for readers of the state file and read back for
/// diagnostics only; [`TransactionRecord::into_transaction`] recomputes it
/// from the remaining fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub hash: Option<TxHash>,
    pub payload: Payload,
    pub parent1: TxHash,
    pub parent2: TxHash,
    pub node_id: NodeId,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub signature: Option<Signature>,
}

impl TransactionRecord {
    pub fn into_transaction(self) -> Result<Transaction, TransactionError> {
        Transaction::new(
            self.payload,
            self.parent1,
            self.parent2,
            self.node_id,
            self.timestamp,
            self.signature,
        )
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            hash: Some(tx.hash),
            payload: tx.payload.clone(),
            parent1: tx.parent1,
            parent2: tx.parent2,
            node_id: tx.node_id.clone(),
            timestamp: tx.timestamp,
            signature: tx.signature.clone(),
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = TransactionError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        record.into_transaction()
    }
}
