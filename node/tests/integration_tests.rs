//! End-to-end scenarios through the coordinator: submission, confirmation,
//! minting, compute jobs and persistence working together.

use atlas_compute::{ComputeJob, JobPayload, JobStatus};
use atlas_node::{Coordinator, NodeConfig, NodeError};
use atlas_nullables::{NullClock, NullStore};
use atlas_store::{JsonFileStore, StateStore, StoreError};
use atlas_types::{LedgerParams, NodeId, TokenAmount};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn coordinator() -> Coordinator {
    Coordinator::new(LedgerParams::default())
        .with_clock(Box::new(NullClock::ticking(1_700_000_000, 1)))
        .with_seed(7)
}

fn tokens(t: f64) -> TokenAmount {
    TokenAmount::from_tokens(t).unwrap()
}

fn node(id: &str) -> NodeId {
    NodeId::new(id)
}

fn confirm(c: &mut Coordinator, ticks: usize) {
    for _ in 0..ticks {
        c.confirm_tick();
    }
}

fn job(id: &str, node_id: &str, cost: f64) -> ComputeJob {
    let mut payload = JobPayload::new();
    payload.insert("task".into(), serde_json::json!("matrix_multiply"));
    payload.insert("size".into(), serde_json::json!(64));
    ComputeJob::new(id, node_id, tokens(cost), payload)
}

/// node_a holds 500 tokens from one confirmed 50 kWh solar report.
fn funded() -> Coordinator {
    let mut c = coordinator();
    c.submit_energy("node_a", 50.0, "solar_panel_1").unwrap();
    confirm(&mut c, 3);
    assert_eq!(c.process_minting().len(), 1);
    c
}

// ---------------------------------------------------------------------------
// Minting
// ---------------------------------------------------------------------------

#[test]
fn confirmed_solar_report_mints_tokens() {
    let c = funded();
    assert_eq!(c.balance(&node("node_a")), tokens(500.0));
    assert_eq!(c.total_supply(), tokens(500.0));
}

#[test]
fn below_threshold_mints_nothing() {
    let mut c = coordinator();
    c.submit_energy("node_a", 50.0, "solar_panel_1").unwrap();
    confirm(&mut c, 2);
    assert!(c.process_minting().is_empty());
    assert_eq!(c.total_supply(), TokenAmount::ZERO);
}

#[test]
fn unknown_source_mints_nothing() {
    let mut c = coordinator();
    let hash = c.submit_energy("node_a", 50.0, "unknown_source").unwrap();
    confirm(&mut c, 3);
    assert!(c.process_minting().is_empty());
    assert_eq!(c.balance(&node("node_a")), TokenAmount::ZERO);
    assert!(!c.is_minted(&hash));
    assert!(c.transaction(&hash).is_some());
}

#[test]
fn out_of_range_amount_mints_nothing() {
    let mut c = coordinator();
    c.submit_energy("node_a", 0.05, "solar_panel_1").unwrap();
    c.submit_energy("node_b", 10_000.5, "wind_farm").unwrap();
    confirm(&mut c, 5);
    assert!(c.process_minting().is_empty());
    assert_eq!(c.total_supply(), TokenAmount::ZERO);
}

#[test]
fn minting_happens_exactly_once() {
    let mut c = funded();
    assert!(c.process_minting().is_empty());
    confirm(&mut c, 10);
    assert!(c.process_minting().is_empty());
    assert_eq!(c.balance(&node("node_a")), tokens(500.0));
    assert_eq!(c.total_supply(), tokens(500.0));
}

#[test]
fn supply_matches_sum_of_balances() {
    let mut c = coordinator();
    c.submit_energy("node_a", 12.5, "solar_roof").unwrap();
    c.submit_energy("node_b", 3.0, "hydro_dam").unwrap();
    c.submit_energy("node_c", 7.25, "geothermal_well").unwrap();
    confirm(&mut c, 3);
    c.process_minting();
    let sum: TokenAmount = c.balances().values().sum();
    assert_eq!(sum, c.total_supply());
}

// ---------------------------------------------------------------------------
// Compute jobs
// ---------------------------------------------------------------------------

#[test]
fn unfunded_job_is_refused() {
    let mut c = funded();
    assert!(!c.submit_compute_job(job("job_b", "node_b", 10.0)));
    assert_eq!(c.queue_length(), 0);
}

#[test]
fn job_runs_and_charges_node() {
    let mut c = funded();
    assert!(c.submit_compute_job(job("job_1", "node_a", 10.0)));
    assert_eq!(c.queue_length(), 1);

    let result = c.execute_next_job().unwrap();
    assert_eq!(result.job_id, "job_1");
    assert_eq!(result.node_id, node("node_a"));
    assert_eq!(result.status, JobStatus::Completed);
    assert!(result.result < 1_000_000);
    assert_eq!(c.balance(&node("node_a")), tokens(490.0));
    assert_eq!(c.total_supply(), tokens(490.0));
}

#[test]
fn identical_payloads_give_identical_results() {
    let mut c = funded();
    c.submit_compute_job(job("first", "node_a", 1.0));
    c.submit_compute_job(job("second", "node_a", 1.0));
    let a = c.execute_next_job().unwrap();
    let b = c.execute_next_job().unwrap();
    assert_eq!(a.result, b.result);
}

#[test]
fn empty_queue_reports_no_jobs() {
    let mut c = coordinator();
    let err = c.execute_next_job().unwrap_err();
    assert_eq!(err.code(), "no_jobs_in_queue");
    assert_eq!(err.to_string(), "no_jobs_in_queue");
}

#[test]
fn balance_spent_before_execution_fails_job() {
    let mut c = funded();
    assert!(c.submit_compute_job(job("big_1", "node_a", 300.0)));
    assert!(c.submit_compute_job(job("big_2", "node_a", 300.0)));

    c.execute_next_job().unwrap();
    let err = c.execute_next_job().unwrap_err();
    assert_eq!(err.code(), "insufficient_balance");
    assert_eq!(c.queue_length(), 0);
    assert_eq!(c.balance(&node("node_a")), tokens(200.0));
}

#[test]
fn jobs_run_in_submission_order() {
    let mut c = funded();
    for id in ["j1", "j2", "j3"] {
        assert!(c.submit_compute_job(job(id, "node_a", 1.0)));
    }
    let order: Vec<String> = (0..3).map(|_| c.execute_next_job().unwrap().job_id).collect();
    assert_eq!(order, ["j1", "j2", "j3"]);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

fn busy_world() -> Coordinator {
    let mut c = funded();
    c.register_node("node_idle").unwrap();
    c.submit_energy("node_b", 20.0, "wind_1").unwrap();
    c.submit_energy("node_c", 4.0, "hydro_2").unwrap();
    confirm(&mut c, 1);
    c.submit_compute_job(job("queued", "node_a", 25.0));
    c
}

fn assert_same_world(a: &Coordinator, b: &Coordinator) {
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.balances(), b.balances());
    assert_eq!(a.total_supply(), b.total_supply());
    assert_eq!(a.queue_length(), b.queue_length());
    assert_eq!(a.graph().to_parts(), b.graph().to_parts());
    assert_eq!(a.stats(), b.stats());
}

#[test]
fn null_store_round_trip() {
    let original = busy_world();
    let store = NullStore::new();
    original.save(&store).unwrap();
    assert_eq!(store.write_count(), 1);

    let mut restored = coordinator();
    assert!(restored.load(&store).unwrap());
    assert_same_world(&original, &restored);
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));
    let original = busy_world();
    original.save(&store).unwrap();

    let doc: serde_json::Value =
        serde_json::from_slice(&store.read().unwrap().unwrap()).unwrap();
    assert_eq!(doc["balances"]["node_a"], 500.0);
    assert_eq!(doc["job_queue"][0]["job_id"], "queued");

    let mut restored = coordinator();
    assert!(restored.load(&store).unwrap());
    assert_same_world(&original, &restored);
}

#[test]
fn missing_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    let mut c = coordinator();
    assert!(!c.load(&store).unwrap());
    assert!(c.graph().is_empty());
}

#[test]
fn corrupted_state_fails_and_keeps_world() {
    let mut c = busy_world();
    let before = c.stats();
    let store = NullStore::with_bytes("{ not json");
    let err = c.load(&store).unwrap_err();
    assert!(matches!(err, NodeError::Store(StoreError::Corruption(_))));
    assert_eq!(c.stats(), before);
}

#[test]
fn tampered_supply_fails_load() {
    let original = busy_world();
    let store = NullStore::new();
    original.save(&store).unwrap();

    let mut doc: serde_json::Value = serde_json::from_slice(&store.contents().unwrap()).unwrap();
    doc["total_supply"] = serde_json::json!(9999.0);
    store.replace(serde_json::to_vec(&doc).unwrap());

    let mut c = coordinator();
    assert!(c.load(&store).is_err());
    assert!(c.graph().is_empty());
}

#[test]
fn minting_stays_exactly_once_after_reload() {
    let original = funded();
    let store = NullStore::new();
    original.save(&store).unwrap();

    let mut restored = coordinator();
    restored.load(&store).unwrap();
    confirm(&mut restored, 3);
    assert!(restored.process_minting().is_empty());
    assert_eq!(restored.total_supply(), tokens(500.0));
}

#[test]
fn reloaded_world_keeps_growing() {
    let original = busy_world();
    let store = NullStore::new();
    original.save(&store).unwrap();

    let mut restored = coordinator();
    restored.load(&store).unwrap();
    let before = restored.graph().len();
    let hash = restored.submit_energy("node_d", 1.0, "solar_x").unwrap();
    assert_eq!(restored.graph().len(), before + 1);
    assert!(restored.graph().is_tip(&hash));
    assert_eq!(restored.execute_next_job().unwrap().job_id, "queued");
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_threshold_drives_minting() {
    let config = NodeConfig::from_toml_str("confirmation_threshold = 1\ntokens_per_kwh = 2.0\n").unwrap();
    let mut c = Coordinator::from_config(&config)
        .with_clock(Box::new(NullClock::new(1)))
        .with_seed(3);
    c.submit_energy("node_a", 5.0, "solar_1").unwrap();
    confirm(&mut c, 1);
    assert_eq!(c.process_minting().len(), 1);
    assert_eq!(c.balance(&node("node_a")), tokens(10.0));
}
