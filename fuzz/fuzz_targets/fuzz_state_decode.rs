#![no_main]

use atlas_store::PersistenceCodec;
use atlas_types::LedgerParams;
use libfuzzer_sys::fuzz_target;

// Loading arbitrary bytes must fail cleanly, and anything that loads must
// survive another save/load unchanged.
fuzz_target!(|data: &[u8]| {
    let params = LedgerParams::default();
    let Ok(world) = PersistenceCodec::from_bytes(data, &params) else {
        return;
    };
    assert!(world.tokens.is_consistent());

    let bytes = PersistenceCodec::to_bytes(&world).expect("loaded world re-encodes");
    let again = PersistenceCodec::from_bytes(&bytes, &params).expect("re-encoded world loads");
    assert_eq!(world.graph.to_parts(), again.graph.to_parts());
    assert_eq!(world.tokens, again.tokens);
    assert_eq!(world.jobs, again.jobs);
});
