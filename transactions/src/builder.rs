//! Fluent construction of transactions.

use atlas_crypto::NodeWallet;
use atlas_types::{NodeId, Timestamp, TxHash};

use crate::error::TransactionError;
use crate::payload::Payload;
use crate::{canonical_bytes, Transaction};

/// Builds a [`Transaction`]; parents default to genesis.
pub struct TransactionBuilder<'w> {
    payload: Payload,
    node_id: NodeId,
    parents: [TxHash; 2],
    timestamp: Timestamp,
    signer: Option<&'w NodeWallet>,
}

impl<'w> TransactionBuilder<'w> {
    pub fn new(node_id: impl Into<NodeId>, payload: Payload) -> Self {
        Self {
            payload,
            node_id: node_id.into(),
            parents: [TxHash::GENESIS; 2],
            timestamp: Timestamp::EPOCH,
            signer: None,
        }
    }

    /// Shorthand for an energy contribution report.
    pub fn energy(node_id: impl Into<NodeId>, amount_kwh: f64, source_id: &str) -> Self {
        Self::new(node_id, Payload::energy(amount_kwh, source_id))
    }

    pub fn parents(mut self, parent1: TxHash, parent2: TxHash) -> Self {
        self.parents = [parent1, parent2];
        self
    }

    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sign the unsigned canonical form with `wallet` at build time.
    pub fn signed_with(mut self, wallet: &'w NodeWallet) -> Self {
        self.signer = Some(wallet);
        self
    }

    pub fn build(self) -> Result<Transaction, TransactionError> {
        let [parent1, parent2] = self.parents;
        let signature = match self.signer {
            Some(wallet) => {
                let bytes = canonical_bytes(
                    &self.payload,
                    &parent1,
                    &parent2,
                    &self.node_id,
                    self.timestamp,
                    None,
                )?;
                Some(wallet.sign(&bytes))
            }
            None => None,
        };
        Transaction::new(
            self.payload,
            parent1,
            parent2,
            self.node_id,
            self.timestamp,
            signature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_genesis_parents() {
        let tx = TransactionBuilder::energy("node_a", 5.0, "wind_farm")
            .build()
            .unwrap();
        assert!(tx.parent1().is_genesis());
        assert!(tx.parent2().is_genesis());
        assert!(tx.signature().is_none());
    }

    #[test]
    fn signed_transaction_carries_verifiable_signature() {
        let wallet = NodeWallet::from_seed(&[5u8; 32]);
        let tx = TransactionBuilder::energy("node_a", 5.0, "hydro_dam")
            .timestamp(Timestamp::new(1_700_000_000))
            .signed_with(&wallet)
            .build()
            .unwrap();
        assert!(tx.signature().is_some());
        assert!(tx.is_signed_by(wallet.public_key()).unwrap());

        let stranger = NodeWallet::from_seed(&[6u8; 32]);
        assert!(!tx.is_signed_by(stranger.public_key()).unwrap());
    }

    #[test]
    fn unsigned_transaction_is_signed_by_nobody() {
        let wallet = NodeWallet::from_seed(&[5u8; 32]);
        let tx = TransactionBuilder::energy("node_a", 5.0, "hydro_dam").build().unwrap();
        assert!(!tx.is_signed_by(wallet.public_key()).unwrap());
    }
}
