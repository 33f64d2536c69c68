#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

pub const SAMPLE_REGIONS: &str = "tests/fixtures/sample_regions.json";
pub const SAMPLE_INVALID_REGIONS: &str = "tests/fixtures/sample_invalid_regions.json";

/// Writes a flat grey PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbImage::from_pixel(width, height, Rgb([200, 200, 200]))
        .save(path)
        .expect("write png file");
}

/// Writes a region list with one record per `(label, x, y, width, height)`.
pub fn write_regions(path: &Path, regions: &[(&str, f64, f64, f64, f64)]) {
    let records: Vec<serde_json::Value> = regions
        .iter()
        .map(|(label, x, y, width, height)| {
            serde_json::json!({
                "section": "Test",
                "label": label,
                "text": format!("{label} text"),
                "x": x,
                "y": y,
                "width": width,
                "height": height,
            })
        })
        .collect();
    fs::write(path, serde_json::to_string_pretty(&records).unwrap()).expect("write regions file");
}
