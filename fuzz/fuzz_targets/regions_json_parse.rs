//! Fuzz target for region list JSON parsing.
//!
//! Feeds arbitrary bytes to the region JSON reader, checking for panics,
//! crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wiremark::ir::io_json::from_regions_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_regions_slice(data);
});
