//! Fuzz target: zone config parsing
//!
//! Any UTF-8 input either fails validation or yields zones whose relay
//! pins are in range and whose names are unique.
//!
//! cargo fuzz run fuzz_zone_config

#![no_main]

use std::collections::BTreeSet;
use std::path::Path;

use irrigator::config::{self, MAX_RELAY_PIN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(zones) = config::parse_zone_configs(text, Path::new("fuzz.json")) else {
        return;
    };

    assert!(!zones.is_empty());
    let mut names = BTreeSet::new();
    for zone in &zones {
        assert!(zone.relay_pin <= MAX_RELAY_PIN);
        assert!(names.insert(zone.name.as_str()), "duplicate zone {}", zone.name);
        if zone.interval.is_some() {
            assert!(zone.intervaled_supply <= zone.max_supply_per_day);
        }
    }
});
