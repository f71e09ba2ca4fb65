//! On-disk layout.
//!
//! Field names and nesting are a compatibility contract with external
//! tooling; rename nothing here.

use std::collections::BTreeMap;

use atlas_compute::ComputeJob;
use atlas_transactions::TransactionRecord;
use atlas_types::{NodeId, TokenAmount, TxHash};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub nodes: Vec<NodeId>,
    pub balances: BTreeMap<NodeId, TokenAmount>,
    pub total_supply: TokenAmount,
    /// Order carries no meaning.
    pub processed_transactions: Vec<TxHash>,
    pub dag: PersistedDag,
    /// Pending jobs, oldest first.
    pub job_queue: Vec<ComputeJob>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedDag {
    pub transactions: Vec<TransactionRecord>,
    pub tips: Vec<TxHash>,
    pub confirmations: BTreeMap<TxHash, u64>,
    /// Derivable from `transactions`; older files may omit it.
    #[serde(default)]
    pub parents: BTreeMap<TxHash, [TxHash; 2]>,
}
