//! World ⇄ persisted state.

use std::collections::BTreeSet;

use atlas_compute::JobScheduler;
use atlas_ledger::{GraphParts, LedgerGraph};
use atlas_tokens::{MintingSettlement, TokenLedger};
use atlas_transactions::{Transaction, TransactionRecord};
use atlas_types::{LedgerParams, NodeId};

use crate::error::StoreError;
use crate::schema::{PersistedDag, PersistedState};

/// Everything a running ledger owns.
#[derive(Clone, Debug)]
pub struct World {
    pub nodes: BTreeSet<NodeId>,
    pub graph: LedgerGraph,
    pub tokens: TokenLedger,
    pub minting: MintingSettlement,
    pub jobs: JobScheduler,
}

impl World {
    pub fn new(params: &LedgerParams) -> Self {
        Self {
            nodes: BTreeSet::new(),
            graph: LedgerGraph::new(),
            tokens: TokenLedger::new(),
            minting: MintingSettlement::new(params),
            jobs: JobScheduler::new(),
        }
    }
}

pub struct PersistenceCodec;

impl PersistenceCodec {
    /// Capture the primary state of `world`. Derived indices are left out.
    pub fn encode(world: &World) -> PersistedState {
        let parts = world.graph.to_parts();
        PersistedState {
            nodes: world.nodes.iter().cloned().collect(),
            balances: world.tokens.balances().clone(),
            total_supply: world.tokens.total_supply(),
            processed_transactions: world.minting.processed().iter().copied().collect(),
            dag: PersistedDag {
                transactions: parts.transactions.iter().map(TransactionRecord::from).collect(),
                tips: parts.tips.into_iter().collect(),
                confirmations: parts.confirmations,
                parents: parts
                    .parents
                    .into_iter()
                    .map(|(child, (p1, p2))| (child, [p1, p2]))
                    .collect(),
            },
            job_queue: world.jobs.iter().cloned().collect(),
        }
    }

    /// Rebuild a world.
    ///
    /// Transactions are re-hashed from their fields, the graph is restored and
    /// its tips validated, then balances, the settled set and the job queue are
    /// restored in that order. Any inconsistency fails the whole load.
    pub fn decode(state: PersistedState, params: &LedgerParams) -> Result<World, StoreError> {
        let PersistedState {
            nodes,
            balances,
            total_supply,
            processed_transactions,
            dag,
            job_queue,
        } = state;

        let mut transactions = Vec::with_capacity(dag.transactions.len());
        for record in dag.transactions {
            let stored = record.hash;
            let tx = Transaction::try_from(record)
                .map_err(|e| StoreError::Corruption(format!("transaction record: {e}")))?;
            if let Some(stored) = stored.filter(|h| h != tx.hash()) {
                tracing::warn!(
                    stored = %stored.short(12),
                    recomputed = %tx.hash().short(12),
                    "stored transaction hash differs from recomputed hash"
                );
            }
            transactions.push(tx);
        }

        let graph = LedgerGraph::restore(GraphParts {
            transactions,
            tips: dag.tips.into_iter().collect(),
            confirmations: dag.confirmations,
            parents: dag
                .parents
                .into_iter()
                .map(|(child, [p1, p2])| (child, (p1, p2)))
                .collect(),
        })?;

        let tokens = TokenLedger::restore(balances, total_supply)?;
        let minting = MintingSettlement::restore(params, processed_transactions);

        if let Some(bad) = job_queue.iter().find(|j| !j.is_valid()) {
            return Err(StoreError::Corruption(format!(
                "queued job '{}' is not valid",
                bad.job_id
            )));
        }
        let jobs = JobScheduler::restore(job_queue);

        tracing::debug!(
            transactions = graph.len(),
            tips = graph.tips().len(),
            holders = tokens.holders(),
            queued_jobs = jobs.len(),
            "decoded world"
        );

        Ok(World {
            nodes: nodes.into_iter().collect(),
            graph,
            tokens,
            minting,
            jobs,
        })
    }

    /// Pretty JSON bytes of `world`.
    pub fn to_bytes(world: &World) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(&Self::encode(world))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Parse and decode JSON bytes. Malformed input is corruption.
    pub fn from_bytes(bytes: &[u8], params: &LedgerParams) -> Result<World, StoreError> {
        let state: PersistedState =
            serde_json::from_slice(bytes).map_err(|e| StoreError::Corruption(e.to_string()))?;
        Self::decode(state, params)
    }
}
