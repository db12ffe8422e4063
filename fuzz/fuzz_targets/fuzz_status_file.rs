//! Fuzz target: status file decoding
//!
//! Feeds arbitrary bytes to the status decoder and, for anything that
//! parses, rebuilds zone state from it. Verifies:
//! - No panics under arbitrary input
//! - Rebuilt ledgers never hold more than `LEDGER_CAPACITY` events
//! - Re-encoding a decoded map and decoding it again is lossless
//!
//! cargo fuzz run fuzz_status_file

#![no_main]

use irrigator::ledger::LEDGER_CAPACITY;
use irrigator::status;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(statuses) = status::decode(data) else {
        return;
    };

    let bytes = status::encode(&statuses).expect("decoded status must re-encode");
    let again = status::decode(&bytes).expect("re-encoded status must decode");
    assert_eq!(again, statuses);

    for (name, snapshot) in statuses {
        let state = status::unpack(snapshot);
        assert!(
            state.ledger.len() <= LEDGER_CAPACITY,
            "zone {name} restored {} events",
            state.ledger.len()
        );
    }
});
