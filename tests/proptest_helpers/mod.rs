#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use wiremark::ir::{Region, RegionBox};

pub const BASE_WIDTH: u32 = 1280;
pub const BASE_HEIGHT: u32 = 2400;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A region inside a `BASE_WIDTH` x `BASE_HEIGHT` image.
///
/// Coordinates are whole pixels so ties on `y` are common.
pub fn arb_region() -> impl Strategy<Value = Region> {
    (
        "[A-Za-z ]{0,20}",
        0u32..BASE_WIDTH,
        0u32..BASE_HEIGHT,
        0u32..400,
        0u32..200,
    )
        .prop_map(|(label, x, y, w, h)| {
            let w = w.min(BASE_WIDTH - x);
            let h = h.min(BASE_HEIGHT - y);
            Region::new(
                label,
                RegionBox::from_xywh(f64::from(x), f64::from(y), f64::from(w), f64::from(h)),
            )
        })
}

pub fn arb_regions(max: usize) -> impl Strategy<Value = Vec<Region>> {
    prop::collection::vec(arb_region(), 0..max)
}

/// Regions crowded into a narrow vertical band, forcing long cascades.
pub fn arb_crowded_regions(max: usize) -> impl Strategy<Value = Vec<Region>> {
    prop::collection::vec(
        (0u32..BASE_WIDTH, 0u32..120).prop_map(|(x, y)| {
            Region::new(
                "crowded",
                RegionBox::from_xywh(f64::from(x), f64::from(y), 20.0, 20.0),
            )
        }),
        0..max,
    )
}
