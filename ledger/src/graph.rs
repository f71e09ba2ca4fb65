//! The tangle: transaction store, tip set and confirmation counters.

use std::collections::{BTreeSet, HashMap};

use atlas_transactions::Transaction;
use atlas_types::TxHash;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::LedgerError;

/// Append-only DAG of transactions.
///
/// `children` is a derived index: it is rebuilt from `parents` on restore
/// and never persisted.
#[derive(Clone, Debug)]
pub struct LedgerGraph {
    pub(crate) transactions: HashMap<TxHash, Transaction>,
    /// Admission order, used for every listing so output is reproducible.
    pub(crate) order: Vec<TxHash>,
    pub(crate) tips: BTreeSet<TxHash>,
    pub(crate) children: HashMap<TxHash, Vec<TxHash>>,
    pub(crate) parents: HashMap<TxHash, (TxHash, TxHash)>,
    pub(crate) confirmations: HashMap<TxHash, u64>,
}

impl Default for LedgerGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerGraph {
    /// An empty tangle whose only tip is genesis.
    pub fn new() -> Self {
        Self {
            transactions: HashMap::new(),
            order: Vec::new(),
            tips: BTreeSet::from([TxHash::GENESIS]),
            children: HashMap::new(),
            parents: HashMap::new(),
            confirmations: HashMap::new(),
        }
    }

    /// Admit a transaction.
    ///
    /// Rejects duplicates and transactions whose non-genesis parents are not
    /// already present. On success the new hash becomes a tip, its parents
    /// stop being tips, and each non-genesis parent reference adds one
    /// confirmation to that parent.
    pub fn admit(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        let hash = *tx.hash();
        if hash.is_genesis() || self.transactions.contains_key(&hash) {
            tracing::debug!(hash = %hash.short(12), "rejected duplicate transaction");
            return Err(LedgerError::DuplicateTransaction { hash });
        }
        let [parent1, parent2] = tx.parents();
        for parent in [parent1, parent2] {
            if !self.contains(&parent) {
                tracing::debug!(
                    hash = %hash.short(12),
                    parent = %parent.short(12),
                    "rejected transaction with unknown parent"
                );
                return Err(LedgerError::UnknownParent { hash, parent });
            }
        }

        self.transactions.insert(hash, tx);
        self.order.push(hash);
        self.parents.insert(hash, (parent1, parent2));
        self.confirmations.insert(hash, 0);
        self.link_children(hash, parent1, parent2);

        self.tips.insert(hash);
        self.tips.remove(&parent1);
        self.tips.remove(&parent2);

        for parent in [parent1, parent2] {
            if !parent.is_genesis() {
                *self.confirmations.entry(parent).or_insert(0) += 1;
            }
        }

        tracing::debug!(hash = %hash.short(12), tips = self.tips.len(), "admitted transaction");
        Ok(())
    }

    pub(crate) fn link_children(&mut self, hash: TxHash, parent1: TxHash, parent2: TxHash) {
        if !parent1.is_genesis() {
            self.children.entry(parent1).or_default().push(hash);
        }
        if !parent2.is_genesis() && parent2 != parent1 {
            self.children.entry(parent2).or_default().push(hash);
        }
    }

    /// Pick `k` tips to attach a new transaction to, using the thread RNG.
    pub fn select_tips(&self, k: usize) -> Vec<TxHash> {
        self.select_tips_with(k, &mut rand::thread_rng())
    }

    /// Pick `k` tips using the given RNG.
    ///
    /// Fewer than `k` tips are returned in full, padded with genesis. With
    /// more than `k` tips a uniform sample of `k` distinct tips is drawn.
    /// This is a simulation-grade choice, not a weighted random walk.
    pub fn select_tips_with<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Vec<TxHash> {
        let available: Vec<TxHash> = self.tips.iter().copied().collect();
        if available.len() <= k {
            let mut selected = available;
            selected.resize(k, TxHash::GENESIS);
            return selected;
        }
        available.choose_multiple(rng, k).copied().collect()
    }

    /// Genesis is maximally confirmed; unknown hashes have no confirmations.
    pub fn confirmation_count(&self, hash: &TxHash) -> u64 {
        if hash.is_genesis() {
            return u64::MAX;
        }
        self.confirmations.get(hash).copied().unwrap_or(0)
    }

    pub fn is_confirmed(&self, hash: &TxHash, threshold: u64) -> bool {
        self.confirmation_count(hash) >= threshold
    }

    /// Add one confirmation to every current non-genesis tip.
    ///
    /// Models an external confirmation event. Returns the number of tips
    /// touched.
    pub fn confirm_tips(&mut self) -> usize {
        let mut touched = 0;
        for tip in self.tips.iter().filter(|t| !t.is_genesis()) {
            if let Some(count) = self.confirmations.get_mut(tip) {
                *count += 1;
                touched += 1;
            }
        }
        touched
    }

    /// Recompute the tip set from the graph.
    ///
    /// A tip is an admitted transaction with no recorded child. Genesis is
    /// the only tip of an empty graph. Returns how many entries changed.
    pub fn validate_tips(&mut self) -> usize {
        let derived: BTreeSet<TxHash> = if self.order.is_empty() {
            BTreeSet::from([TxHash::GENESIS])
        } else {
            self.order
                .iter()
                .filter(|h| self.children.get(*h).map_or(true, |c| c.is_empty()))
                .copied()
                .collect()
        };
        let changed = self.tips.symmetric_difference(&derived).count();
        if changed > 0 {
            tracing::warn!(changed, "repaired tip set");
        }
        self.tips = derived;
        changed
    }

    /// True for genesis and for every admitted hash.
    pub fn contains(&self, hash: &TxHash) -> bool {
        hash.is_genesis() || self.transactions.contains_key(hash)
    }

    pub fn get(&self, hash: &TxHash) -> Option<&Transaction> {
        self.transactions.get(hash)
    }

    /// All transactions in admission order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.order.iter().filter_map(|h| self.transactions.get(h))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn tips(&self) -> &BTreeSet<TxHash> {
        &self.tips
    }

    pub fn is_tip(&self, hash: &TxHash) -> bool {
        self.tips.contains(hash)
    }

    /// Children of `hash` in the order they were admitted.
    pub fn children(&self, hash: &TxHash) -> &[TxHash] {
        self.children.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parents_of(&self, hash: &TxHash) -> Option<(TxHash, TxHash)> {
        self.parents.get(hash).copied()
    }

    /// `(hash, confirmations)` pairs in admission order.
    pub fn confirmations(&self) -> impl Iterator<Item = (TxHash, u64)> + '_ {
        self.order
            .iter()
            .map(|h| (*h, self.confirmations.get(h).copied().unwrap_or(0)))
    }

    /// `(hash, (parent1, parent2))` pairs in admission order.
    pub fn parent_links(&self) -> impl Iterator<Item = (TxHash, (TxHash, TxHash))> + '_ {
        self.order
            .iter()
            .filter_map(|h| self.parents.get(h).map(|p| (*h, *p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_transactions::TransactionBuilder;
    use atlas_types::Timestamp;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tx(ts: u64, p1: TxHash, p2: TxHash) -> Transaction {
        TransactionBuilder::energy("node_a", 10.0, "solar_roof")
            .parents(p1, p2)
            .timestamp(Timestamp::new(ts))
            .build()
            .unwrap()
    }

    #[test]
    fn new_graph_has_only_genesis_tip() {
        let g = LedgerGraph::new();
        assert!(g.is_empty());
        assert_eq!(g.tips().iter().copied().collect::<Vec<_>>(), vec![TxHash::GENESIS]);
        assert_eq!(g.select_tips(2), vec![TxHash::GENESIS, TxHash::GENESIS]);
    }

    #[test]
    fn admit_updates_tips_children_and_confirmations() {
        let mut g = LedgerGraph::new();
        let a = tx(1, TxHash::GENESIS, TxHash::GENESIS);
        let ha = *a.hash();
        g.admit(a).unwrap();
        assert!(g.is_tip(&ha));
        assert!(!g.is_tip(&TxHash::GENESIS));
        assert_eq!(g.confirmation_count(&ha), 0);

        let b = tx(2, ha, TxHash::GENESIS);
        let hb = *b.hash();
        g.admit(b).unwrap();
        assert!(g.is_tip(&hb));
        assert!(!g.is_tip(&ha));
        assert_eq!(g.children(&ha), &[hb]);
        assert_eq!(g.confirmation_count(&ha), 1);
        assert_eq!(g.parents_of(&hb), Some((ha, TxHash::GENESIS)));
        assert!(g.children(&TxHash::GENESIS).is_empty());
    }

    #[test]
    fn duplicate_is_rejected_without_change() {
        let mut g = LedgerGraph::new();
        let a = tx(1, TxHash::GENESIS, TxHash::GENESIS);
        g.admit(a.clone()).unwrap();
        let before_tips = g.tips().clone();
        let err = g.admit(a).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTransaction { .. }));
        assert!(err.is_rejection());
        assert_eq!(g.len(), 1);
        assert_eq!(g.tips(), &before_tips);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut g = LedgerGraph::new();
        let ghost = TxHash::new([9u8; 32]);
        let err = g.admit(tx(1, ghost, TxHash::GENESIS)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownParent {
                hash: *tx(1, ghost, TxHash::GENESIS).hash(),
                parent: ghost
            }
        );
        assert!(g.is_empty());
    }

    #[test]
    fn same_parent_twice_links_child_once() {
        let mut g = LedgerGraph::new();
        let a = tx(1, TxHash::GENESIS, TxHash::GENESIS);
        let ha = *a.hash();
        g.admit(a).unwrap();
        g.admit(tx(2, ha, ha)).unwrap();
        assert_eq!(g.children(&ha).len(), 1);
        assert_eq!(g.confirmation_count(&ha), 2);
    }

    #[test]
    fn genesis_and_unknown_confirmation_counts() {
        let g = LedgerGraph::new();
        assert_eq!(g.confirmation_count(&TxHash::GENESIS), u64::MAX);
        assert!(g.is_confirmed(&TxHash::GENESIS, 1_000));
        assert_eq!(g.confirmation_count(&TxHash::new([1; 32])), 0);
    }

    #[test]
    fn confirm_tips_skips_genesis() {
        let mut g = LedgerGraph::new();
        assert_eq!(g.confirm_tips(), 0);
        let a = tx(1, TxHash::GENESIS, TxHash::GENESIS);
        let ha = *a.hash();
        g.admit(a).unwrap();
        assert_eq!(g.confirm_tips(), 1);
        assert_eq!(g.confirm_tips(), 1);
        assert_eq!(g.confirmation_count(&ha), 2);
    }

    #[test]
    fn select_tips_pads_and_samples() {
        let mut g = LedgerGraph::new();
        let a = tx(1, TxHash::GENESIS, TxHash::GENESIS);
        let ha = *a.hash();
        g.admit(a).unwrap();
        assert_eq!(g.select_tips(2), vec![ha, TxHash::GENESIS]);

        for ts in 2..6 {
            g.admit(tx(ts, TxHash::GENESIS, TxHash::GENESIS)).unwrap();
        }
        assert_eq!(g.tips().len(), 5);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = g.select_tips_with(2, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0], picked[1]);
        assert!(picked.iter().all(|h| g.is_tip(h)));
    }

    #[test]
    fn validate_tips_repairs_stale_entries() {
        let mut g = LedgerGraph::new();
        let a = tx(1, TxHash::GENESIS, TxHash::GENESIS);
        let ha = *a.hash();
        g.admit(a).unwrap();
        g.admit(tx(2, ha, TxHash::GENESIS)).unwrap();
        g.tips.insert(ha);
        g.tips.insert(TxHash::new([3; 32]));
        assert_eq!(g.validate_tips(), 2);
        assert!(!g.is_tip(&ha));
        assert_eq!(g.tips().len(), 1);
    }
}
