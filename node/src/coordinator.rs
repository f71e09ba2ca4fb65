//! The coordinator: single owner of the world and the only entry point for
//! changing it.
//!
//! Every public operation runs to completion before returning. Hosts that
//! share a coordinator across threads must wrap the whole value in one lock;
//! the graph, balances and settled set are not safe to update piecemeal.

use std::collections::{BTreeMap, BTreeSet};

use atlas_compute::{ComputeError, ComputeExecutor, ComputeJob, JobResult};
use atlas_crypto::NodeWallet;
use atlas_energy::{EnergyContribution, EnergyValidator, RuleValidator};
use atlas_ledger::{ConfirmationPolicy, LedgerGraph};
use atlas_store::{PersistenceCodec, StateStore, World};
use atlas_transactions::{validate_transaction, Transaction, TransactionBuilder};
use atlas_types::{Clock, LedgerParams, NodeId, SystemClock, TokenAmount, TxHash};
use atlas_utils::StatsCounter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::stats::WorldStats;
use crate::tracing_spans;

/// Parents every new transaction references.
const PARENTS_PER_TRANSACTION: usize = 2;

const COUNTERS: &[&str] = &[
    "submitted",
    "rejected",
    "confirm_ticks",
    "minted",
    "jobs_accepted",
    "jobs_refused",
    "jobs_executed",
    "jobs_failed",
];

pub struct Coordinator {
    world: World,
    params: LedgerParams,
    policy: ConfirmationPolicy,
    validator: Box<dyn EnergyValidator>,
    executor: ComputeExecutor,
    clock: Box<dyn Clock>,
    rng: StdRng,
    counters: StatsCounter,
}

impl Coordinator {
    /// An empty world with the wall clock and an entropy-seeded RNG.
    pub fn new(params: LedgerParams) -> Self {
        Self {
            world: World::new(&params),
            policy: ConfirmationPolicy::from(&params),
            validator: Box::new(RuleValidator::new(&params)),
            params,
            executor: ComputeExecutor::new(),
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
            counters: StatsCounter::new(COUNTERS),
        }
    }

    pub fn from_config(config: &NodeConfig) -> Self {
        Self::new(config.ledger_params())
    }

    /// Replace the time source (tests use a fixed clock).
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make tip selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn EnergyValidator>) -> Self {
        self.validator = validator;
        self
    }

    // ── Nodes ──────────────────────────────────────────────────────────

    /// Add a node to the registry. Returns `false` if it was already known.
    pub fn register_node(&mut self, node_id: impl Into<NodeId>) -> Result<bool, NodeError> {
        let node_id = node_id.into();
        if node_id.is_empty() {
            return Err(NodeError::InvalidInput("node id must not be empty".into()));
        }
        let added = self.world.nodes.insert(node_id.clone());
        if added {
            tracing::info!(node = %node_id, "registered node");
        }
        Ok(added)
    }

    // ── Tangle ─────────────────────────────────────────────────────────

    /// Report energy from `node_id`, attaching the new transaction to two
    /// current tips. Registers the node if needed.
    pub fn submit_energy(
        &mut self,
        node_id: impl Into<NodeId>,
        amount_kwh: f64,
        source_id: &str,
    ) -> Result<TxHash, NodeError> {
        self.submit(node_id.into(), amount_kwh, source_id, None)
    }

    /// As [`Coordinator::submit_energy`], with the transaction signed by
    /// `wallet`. The signature is recorded, not verified.
    pub fn submit_signed_energy(
        &mut self,
        wallet: &NodeWallet,
        node_id: impl Into<NodeId>,
        amount_kwh: f64,
        source_id: &str,
    ) -> Result<TxHash, NodeError> {
        self.submit(node_id.into(), amount_kwh, source_id, Some(wallet))
    }

    fn submit(
        &mut self,
        node_id: NodeId,
        amount_kwh: f64,
        source_id: &str,
        wallet: Option<&NodeWallet>,
    ) -> Result<TxHash, NodeError> {
        let span = tracing_spans::submit_span(node_id.as_str());
        let _enter = span.enter();

        let tips = self
            .world
            .graph
            .select_tips_with(PARENTS_PER_TRANSACTION, &mut self.rng);
        let mut builder = TransactionBuilder::energy(node_id.clone(), amount_kwh, source_id)
            .parents(tips[0], tips[1])
            .timestamp(self.clock.now());
        if let Some(wallet) = wallet {
            builder = builder.signed_with(wallet);
        }
        let tx = builder.build()?;
        validate_transaction(&tx)?;

        let hash = *tx.hash();
        if let Err(err) = self.world.graph.admit(tx) {
            self.counters.increment("rejected");
            tracing::debug!(%err, "transaction rejected");
            return Err(err.into());
        }
        self.world.nodes.insert(node_id);
        self.counters.increment("submitted");
        tracing::info!(hash = %hash.short(12), kwh = amount_kwh, source = source_id, "energy submitted");
        Ok(hash)
    }

    /// Add one confirmation to every current tip. Returns how many tips were
    /// touched.
    pub fn confirm_tick(&mut self) -> usize {
        let touched = self.world.graph.confirm_tips();
        self.counters.increment("confirm_ticks");
        tracing::debug!(touched, "confirmation tick");
        touched
    }

    // ── Minting ────────────────────────────────────────────────────────

    /// Confirmed transactions, filtered by the validator, settled exactly
    /// once. Returns the contributions minted by this call.
    pub fn process_minting(&mut self) -> Vec<EnergyContribution> {
        let span = tracing_spans::minting_span(self.policy.threshold);
        let _enter = span.enter();

        let candidates: Vec<EnergyContribution> = self
            .policy
            .confirmed(&self.world.graph)
            .into_iter()
            .filter_map(EnergyContribution::from_transaction)
            .collect();
        let approved = self.validator.validate_batch(candidates);
        let minted = self
            .world
            .minting
            .settle(&mut self.world.tokens, approved);

        self.counters.add("minted", minted.len() as u64);
        if !minted.is_empty() {
            tracing::info!(
                minted = minted.len(),
                total_supply = %self.world.tokens.total_supply(),
                "minting pass complete"
            );
        }
        minted
    }

    // ── Compute jobs ───────────────────────────────────────────────────

    /// Queue a job if it is valid and its node can currently pay for it.
    pub fn submit_compute_job(&mut self, job: ComputeJob) -> bool {
        let job_id = job.job_id.clone();
        match self.world.jobs.submit(job, &self.world.tokens) {
            Ok(()) => {
                self.counters.increment("jobs_accepted");
                tracing::info!(job = %job_id, queue = self.world.jobs.len(), "job accepted");
                true
            }
            Err(err) => {
                self.counters.increment("jobs_refused");
                tracing::info!(job = %job_id, code = err.code(), detail = ?err, "job refused");
                false
            }
        }
    }

    /// Run the oldest queued job. The job leaves the queue even if its node
    /// can no longer pay.
    pub fn execute_next_job(&mut self) -> Result<JobResult, ComputeError> {
        let job = self.world.jobs.next().ok_or(ComputeError::EmptyQueue)?;
        let span = tracing_spans::job_span(&job.job_id);
        let _enter = span.enter();

        match self.executor.execute(&job, &mut self.world.tokens) {
            Ok(result) => {
                self.counters.increment("jobs_executed");
                Ok(result)
            }
            Err(err) => {
                self.counters.increment("jobs_failed");
                tracing::warn!(code = err.code(), detail = ?err, "job failed");
                Err(err)
            }
        }
    }

    // ── Persistence ────────────────────────────────────────────────────

    pub fn save(&self, store: &dyn StateStore) -> Result<(), NodeError> {
        let span = tracing_spans::persist_span("save");
        let _enter = span.enter();

        let bytes = PersistenceCodec::to_bytes(&self.world)?;
        store.write(&bytes)?;
        tracing::info!(
            transactions = self.world.graph.len(),
            bytes = bytes.len(),
            "world saved"
        );
        Ok(())
    }

    /// Replace the world with the stored one.
    ///
    /// Returns `Ok(false)` and leaves the world untouched when the store is
    /// empty. A corrupted state fails the call and also leaves the world
    /// untouched.
    pub fn load(&mut self, store: &dyn StateStore) -> Result<bool, NodeError> {
        let span = tracing_spans::persist_span("load");
        let _enter = span.enter();

        let Some(bytes) = store.read()? else {
            tracing::info!("no saved state, starting fresh");
            return Ok(false);
        };
        let world = PersistenceCodec::from_bytes(&bytes, &self.params).map_err(|err| {
            tracing::warn!(%err, "saved state rejected");
            err
        })?;
        tracing::info!(
            transactions = world.graph.len(),
            nodes = world.nodes.len(),
            "world loaded"
        );
        self.world = world;
        Ok(true)
    }

    /// Drop all state and start from an empty world.
    pub fn reset(&mut self) {
        self.world = World::new(&self.params);
        self.counters.reset();
    }

    // ── Read-only accessors ────────────────────────────────────────────

    pub fn balance(&self, node_id: &NodeId) -> TokenAmount {
        self.world.tokens.balance(node_id)
    }

    pub fn balances(&self) -> &BTreeMap<NodeId, TokenAmount> {
        self.world.tokens.balances()
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.world.tokens.total_supply()
    }

    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.world.nodes
    }

    pub fn transaction(&self, hash: &TxHash) -> Option<&Transaction> {
        self.world.graph.get(hash)
    }

    pub fn queue_length(&self) -> usize {
        self.world.jobs.len()
    }

    pub fn graph(&self) -> &LedgerGraph {
        &self.world.graph
    }

    pub fn is_minted(&self, hash: &TxHash) -> bool {
        self.world.minting.is_processed(hash)
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    /// Activity counters since start-up or the last reset.
    pub fn counters(&self) -> Vec<(&'static str, u64)> {
        self.counters.snapshot()
    }

    pub fn stats(&self) -> WorldStats {
        let graph = &self.world.graph;
        WorldStats {
            total_transactions: graph.len(),
            confirmed_transactions: self.policy.confirmed(graph).len(),
            tips: graph.tips().iter().filter(|t| !t.is_genesis()).count(),
            nodes: self.world.nodes.len(),
            total_supply: self.world.tokens.total_supply(),
            holders: self.world.tokens.holders(),
            queue_length: self.world.jobs.len(),
            minted_transactions: self.world.minting.processed().len(),
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(LedgerParams::default())
    }
}
