//! Rebuilding a tangle from persisted parts.
//!
//! Restore order matters: transactions first (hashes recomputed on decode),
//! then tips and confirmation counters, then parent links, from which
//! `children` is derived. Tips are validated last, once every transaction and
//! link is present.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use atlas_transactions::Transaction;
use atlas_types::TxHash;

use crate::error::LedgerError;
use crate::graph::LedgerGraph;

/// The persisted shape of a tangle. `children` is deliberately absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphParts {
    pub transactions: Vec<Transaction>,
    pub tips: BTreeSet<TxHash>,
    pub confirmations: BTreeMap<TxHash, u64>,
    pub parents: BTreeMap<TxHash, (TxHash, TxHash)>,
}

impl LedgerGraph {
    /// Snapshot the primary state of the graph.
    pub fn to_parts(&self) -> GraphParts {
        GraphParts {
            transactions: self.transactions().cloned().collect(),
            tips: self.tips.clone(),
            confirmations: self.confirmations().collect(),
            parents: self.parent_links().collect(),
        }
    }

    /// Rebuild a graph from persisted parts.
    ///
    /// Fails with [`LedgerError::Corruption`] when the parts cannot describe a
    /// valid tangle: duplicate records, a stored parent link that contradicts
    /// the transaction it belongs to, or a parent that is not present.
    /// Entries that refer to unknown transactions are dropped.
    pub fn restore(parts: GraphParts) -> Result<Self, LedgerError> {
        let GraphParts {
            transactions,
            tips,
            confirmations,
            parents,
        } = parts;

        let mut graph = LedgerGraph {
            transactions: HashMap::with_capacity(transactions.len()),
            order: Vec::with_capacity(transactions.len()),
            tips: BTreeSet::new(),
            children: HashMap::new(),
            parents: HashMap::with_capacity(transactions.len()),
            confirmations: HashMap::with_capacity(transactions.len()),
        };

        for tx in transactions {
            let hash = *tx.hash();
            if graph.transactions.insert(hash, tx).is_some() {
                return Err(LedgerError::Corruption(format!(
                    "transaction {hash} stored twice"
                )));
            }
            graph.order.push(hash);
        }

        graph.tips = tips;
        for (hash, count) in confirmations {
            if graph.transactions.contains_key(&hash) {
                graph.confirmations.insert(hash, count);
            } else if !hash.is_genesis() {
                tracing::warn!(hash = %hash.short(12), "dropping confirmations for unknown transaction");
            }
        }
        for hash in &graph.order {
            graph.confirmations.entry(*hash).or_insert(0);
        }

        for (child, link) in parents {
            let Some(tx) = graph.transactions.get(&child) else {
                tracing::warn!(hash = %child.short(12), "dropping parent link for unknown transaction");
                continue;
            };
            let [p1, p2] = tx.parents();
            if link != (p1, p2) {
                return Err(LedgerError::Corruption(format!(
                    "stored parents of {child} do not match the transaction"
                )));
            }
            graph.parents.insert(child, link);
        }

        let order = graph.order.clone();
        for hash in order {
            let [p1, p2] = match graph.transactions.get(&hash) {
                Some(tx) => tx.parents(),
                None => continue,
            };
            for parent in [p1, p2] {
                if !graph.contains(&parent) {
                    return Err(LedgerError::Corruption(format!(
                        "transaction {hash} references missing parent {parent}"
                    )));
                }
            }
            graph.parents.entry(hash).or_insert((p1, p2));
            graph.link_children(hash, p1, p2);
        }

        graph.validate_tips();
        Ok(graph)
    }
}
