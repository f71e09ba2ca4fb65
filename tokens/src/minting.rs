//! Exactly-once settlement of confirmed contributions.

use std::collections::BTreeSet;

use atlas_energy::EnergyContribution;
use atlas_types::{LedgerParams, TokenAmount, TxHash};

use crate::error::TokenError;
use crate::ledger::TokenLedger;

/// Converts contributions into credits and remembers what it settled.
///
/// The processed set is part of the persisted world, so the exactly-once
/// guarantee survives restarts.
#[derive(Clone, Debug, PartialEq)]
pub struct MintingSettlement {
    processed: BTreeSet<TxHash>,
    tokens_per_kwh: f64,
}

impl Default for MintingSettlement {
    fn default() -> Self {
        Self::new(&LedgerParams::default())
    }
}

impl MintingSettlement {
    pub fn new(params: &LedgerParams) -> Self {
        Self {
            processed: BTreeSet::new(),
            tokens_per_kwh: params.tokens_per_kwh,
        }
    }

    pub fn restore(params: &LedgerParams, processed: impl IntoIterator<Item = TxHash>) -> Self {
        Self {
            processed: processed.into_iter().collect(),
            tokens_per_kwh: params.tokens_per_kwh,
        }
    }

    pub fn is_processed(&self, hash: &TxHash) -> bool {
        self.processed.contains(hash)
    }

    pub fn processed(&self) -> &BTreeSet<TxHash> {
        &self.processed
    }

    pub fn tokens_per_kwh(&self) -> f64 {
        self.tokens_per_kwh
    }

    /// Tokens owed for `kwh`.
    pub fn reward_for(&self, kwh: f64) -> Result<TokenAmount, TokenError> {
        let tokens = kwh * self.tokens_per_kwh;
        TokenAmount::from_tokens(tokens).ok_or(TokenError::InvalidAmount(tokens))
    }

    /// Credit every not-yet-settled contribution and return those minted by
    /// this call.
    ///
    /// A hash is marked processed only after its credit succeeds; a
    /// contribution whose credit fails is skipped and stays eligible.
    pub fn settle(
        &mut self,
        ledger: &mut TokenLedger,
        contributions: Vec<EnergyContribution>,
    ) -> Vec<EnergyContribution> {
        let mut minted = Vec::new();
        for contribution in contributions {
            let hash = contribution.transaction_hash;
            if self.processed.contains(&hash) {
                continue;
            }
            let credited = self
                .reward_for(contribution.amount_kwh)
                .and_then(|amount| ledger.credit(&contribution.node_id, amount).map(|_| amount));
            match credited {
                Ok(amount) => {
                    self.processed.insert(hash);
                    tracing::info!(
                        hash = %hash.short(12),
                        node = %contribution.node_id,
                        kwh = contribution.amount_kwh,
                        tokens = %amount,
                        "minted tokens for energy contribution"
                    );
                    minted.push(contribution);
                }
                Err(error) => {
                    tracing::warn!(hash = %hash.short(12), %error, "could not settle contribution");
                }
            }
        }
        minted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_types::NodeId;

    fn contribution(byte: u8, node: &str, kwh: f64) -> EnergyContribution {
        EnergyContribution {
            node_id: NodeId::new(node),
            amount_kwh: kwh,
            source_id: "solar_panel_1".into(),
            transaction_hash: TxHash::new([byte; 32]),
        }
    }

    #[test]
    fn mints_at_ten_tokens_per_kwh() {
        let mut ledger = TokenLedger::new();
        let mut minting = MintingSettlement::default();
        let minted = minting.settle(&mut ledger, vec![contribution(1, "node_a", 50.0)]);
        assert_eq!(minted.len(), 1);
        assert_eq!(ledger.balance(&NodeId::new("node_a")).as_tokens(), 500.0);
        assert_eq!(ledger.total_supply().as_tokens(), 500.0);
    }

    #[test]
    fn settles_each_hash_once() {
        let mut ledger = TokenLedger::new();
        let mut minting = MintingSettlement::default();
        let batch = vec![contribution(1, "node_a", 2.0), contribution(2, "node_b", 3.0)];
        assert_eq!(minting.settle(&mut ledger, batch.clone()).len(), 2);
        assert!(minting.settle(&mut ledger, batch).is_empty());
        assert_eq!(ledger.total_supply().as_tokens(), 50.0);
        assert_eq!(minting.processed().len(), 2);
    }

    #[test]
    fn duplicate_within_batch_is_minted_once() {
        let mut ledger = TokenLedger::new();
        let mut minting = MintingSettlement::default();
        let c = contribution(7, "node_a", 1.0);
        let minted = minting.settle(&mut ledger, vec![c.clone(), c]);
        assert_eq!(minted.len(), 1);
        assert_eq!(ledger.total_supply().as_tokens(), 10.0);
    }

    #[test]
    fn restored_set_blocks_resettlement() {
        let mut ledger = TokenLedger::new();
        let params = LedgerParams::default();
        let mut minting = MintingSettlement::restore(&params, [TxHash::new([1; 32])]);
        assert!(minting.is_processed(&TxHash::new([1; 32])));
        assert!(minting.settle(&mut ledger, vec![contribution(1, "node_a", 5.0)]).is_empty());
        assert!(ledger.total_supply().is_zero());
    }

    #[test]
    fn unrepresentable_reward_stays_unprocessed() {
        let mut ledger = TokenLedger::new();
        let mut minting = MintingSettlement::default();
        let minted = minting.settle(&mut ledger, vec![contribution(3, "node_a", -1.0)]);
        assert!(minted.is_empty());
        assert!(!minting.is_processed(&TxHash::new([3; 32])));
    }
}
