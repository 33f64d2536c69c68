//! Fuzz target for label layout.
//!
//! Parses arbitrary bytes as a region list and, when that succeeds, orders
//! and plans it. Extreme coordinates must never panic the slot allocator.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wiremark::layout::fuzz_plan_regions;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let _ = fuzz_plan_regions(data);
});
