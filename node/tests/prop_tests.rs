//! Random operation sequences against the coordinator. Whatever the order,
//! supply equals the sum of balances and a contribution mints at most once.

use std::collections::BTreeSet;

use atlas_compute::{ComputeJob, JobPayload};
use atlas_node::Coordinator;
use atlas_nullables::NullClock;
use atlas_types::{LedgerParams, TokenAmount, TxHash};
use proptest::prelude::*;

const NODES: [&str; 3] = ["node_a", "node_b", "node_c"];
const SOURCES: [&str; 4] = ["solar_panel_1", "wind_turbine_2", "hydro_3", "unknown_source"];

#[derive(Clone, Debug)]
enum Op {
    Submit { node: usize, kwh: f64, source: usize },
    Confirm,
    Mint,
    Job { node: usize, cost_raw: u128 },
    Execute,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..NODES.len(), 0.0f64..2_000.0, 0..SOURCES.len())
            .prop_map(|(node, kwh, source)| Op::Submit { node, kwh, source }),
        4 => Just(Op::Confirm),
        2 => Just(Op::Mint),
        1 => (0..NODES.len(), 1u128..500_000_000).prop_map(|(node, cost_raw)| Op::Job { node, cost_raw }),
        1 => Just(Op::Execute),
    ]
}

fn coordinator(seed: u64) -> Coordinator {
    Coordinator::new(LedgerParams::default())
        .with_clock(Box::new(NullClock::ticking(1_700_000_000, 1)))
        .with_seed(seed)
}

fn supply_matches_balances(c: &Coordinator) -> bool {
    c.total_supply() == c.balances().values().sum::<TokenAmount>()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn supply_invariant_holds_across_operations(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op(), 1..60),
    ) {
        let mut c = coordinator(seed);
        let mut minted: BTreeSet<TxHash> = BTreeSet::new();
        let mut jobs = 0usize;

        for op in ops {
            match op {
                Op::Submit { node, kwh, source } => {
                    let _ = c.submit_energy(NODES[node], kwh, SOURCES[source]);
                }
                Op::Confirm => {
                    c.confirm_tick();
                }
                Op::Mint => {
                    for contribution in c.process_minting() {
                        prop_assert!(minted.insert(contribution.transaction_hash));
                        prop_assert!(c.is_minted(&contribution.transaction_hash));
                    }
                    prop_assert!(c.process_minting().is_empty());
                }
                Op::Job { node, cost_raw } => {
                    jobs += 1;
                    let job = ComputeJob::new(
                        format!("job_{jobs}"),
                        NODES[node],
                        TokenAmount::from_raw(cost_raw),
                        JobPayload::new(),
                    );
                    c.submit_compute_job(job);
                }
                Op::Execute => {
                    let _ = c.execute_next_job();
                }
            }
            prop_assert!(supply_matches_balances(&c));
            for hash in &minted {
                prop_assert!(c.is_minted(hash));
            }
        }
    }
}
