//! Confirmed / pending partition of the tangle.

use atlas_transactions::Transaction;
use atlas_types::LedgerParams;

use crate::graph::LedgerGraph;

/// Transactions with at least `threshold` confirmations, in admission order.
pub fn confirmed(graph: &LedgerGraph, threshold: u64) -> Vec<&Transaction> {
    graph
        .transactions()
        .filter(|tx| graph.confirmation_count(tx.hash()) >= threshold)
        .collect()
}

/// Transactions still below `threshold`, in admission order.
pub fn unconfirmed(graph: &LedgerGraph, threshold: u64) -> Vec<&Transaction> {
    graph
        .transactions()
        .filter(|tx| graph.confirmation_count(tx.hash()) < threshold)
        .collect()
}

/// A confirmation threshold bound to the ledger's policy parameters, so the
/// confirmation query and settlement cannot drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub threshold: u64,
}

impl ConfirmationPolicy {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn confirmed<'g>(&self, graph: &'g LedgerGraph) -> Vec<&'g Transaction> {
        confirmed(graph, self.threshold)
    }

    pub fn unconfirmed<'g>(&self, graph: &'g LedgerGraph) -> Vec<&'g Transaction> {
        unconfirmed(graph, self.threshold)
    }
}

impl From<&LedgerParams> for ConfirmationPolicy {
    fn from(params: &LedgerParams) -> Self {
        Self::new(params.confirmation_threshold)
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::from(&LedgerParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_transactions::TransactionBuilder;
    use atlas_types::{Timestamp, TxHash};

    #[test]
    fn partitions_by_threshold() {
        let mut g = LedgerGraph::new();
        let a = TransactionBuilder::energy("node_a", 1.0, "solar")
            .timestamp(Timestamp::new(1))
            .build()
            .unwrap();
        let ha = *a.hash();
        g.admit(a).unwrap();
        let b = TransactionBuilder::energy("node_b", 1.0, "wind")
            .parents(ha, TxHash::GENESIS)
            .timestamp(Timestamp::new(2))
            .build()
            .unwrap();
        let hb = *b.hash();
        g.admit(b).unwrap();
        g.confirm_tips();
        g.confirm_tips();

        let policy = ConfirmationPolicy::default();
        assert_eq!(policy.threshold, 3);
        // a: 1 by reference; b: 2 by ticks
        assert!(policy.confirmed(&g).is_empty());
        assert_eq!(policy.unconfirmed(&g).len(), 2);

        g.confirm_tips();
        let done: Vec<_> = policy.confirmed(&g).iter().map(|t| *t.hash()).collect();
        assert_eq!(done, vec![hb]);
        assert_eq!(unconfirmed(&g, 3).len(), 1);
        assert_eq!(confirmed(&g, 1).len(), 2);
    }

    #[test]
    fn empty_graph_has_nothing_confirmed() {
        let g = LedgerGraph::new();
        assert!(confirmed(&g, 0).is_empty());
    }
}
