//! Aggregate view of the world for status output.

use atlas_types::TokenAmount;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldStats {
    pub total_transactions: usize,
    pub confirmed_transactions: usize,
    /// Tips other than genesis.
    pub tips: usize,
    pub nodes: usize,
    pub total_supply: TokenAmount,
    pub holders: usize,
    pub queue_length: usize,
    pub minted_transactions: usize,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "transactions:  {} ({} confirmed)", self.total_transactions, self.confirmed_transactions)?;
        writeln!(f, "tips:          {}", self.tips)?;
        writeln!(f, "nodes:         {}", self.nodes)?;
        writeln!(f, "total supply:  {} ({} holders)", self.total_supply, self.holders)?;
        writeln!(f, "minted:        {}", self.minted_transactions)?;
        write!(f, "queued jobs:   {}", self.queue_length)
    }
}
