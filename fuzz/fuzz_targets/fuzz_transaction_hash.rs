#![no_main]

use arbitrary::Arbitrary;
use atlas_transactions::{Transaction, TransactionBuilder};
use atlas_types::{Timestamp, TxHash};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    node_id: String,
    amount_kwh: f64,
    source_id: String,
    parent1: [u8; 32],
    parent2: [u8; 32],
    timestamp: u64,
}

// A finite transaction's hash must be reproduced exactly after a JSON round
// trip, and must never collide with genesis.
fuzz_target!(|input: Input| {
    if !input.amount_kwh.is_finite() {
        return;
    }
    let Ok(tx) = TransactionBuilder::energy(input.node_id, input.amount_kwh, &input.source_id)
        .parents(TxHash::new(input.parent1), TxHash::new(input.parent2))
        .timestamp(Timestamp::new(input.timestamp))
        .build()
    else {
        return;
    };
    assert!(!tx.hash().is_genesis());

    let json = serde_json::to_vec(&tx).expect("transaction serializes");
    let back: Transaction = serde_json::from_slice(&json).expect("transaction deserializes");
    assert_eq!(back.hash(), tx.hash());
    assert_eq!(back, tx);
});
