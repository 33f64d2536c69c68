//! JSON reader for captured region lists.
//!
//! The page renderer emits a flat JSON array, one object per labeled
//! element:
//!
//! ```json
//! [
//!   {"section": "About", "label": "Lead", "text": "We build...",
//!    "charLimit": 80, "x": 120, "y": 640, "width": 560, "height": 48}
//! ]
//! ```
//!
//! `section`, `label` and `text` default to empty strings; `charLimit`
//! (alias `limit`) may be a number, a string, or absent. An empty string
//! limit is treated as absent.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::bbox::RegionBox;
use super::model::{CharLimit, Region};
use crate::error::WiremarkError;

/// A single record as produced by the page renderer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionRecord {
    #[serde(default)]
    section: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    text: String,
    #[serde(default, alias = "limit")]
    char_limit: Option<CharLimit>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<RegionRecord> for Region {
    fn from(record: RegionRecord) -> Self {
        let char_limit = match record.char_limit {
            Some(CharLimit::Text(s)) if s.trim().is_empty() => None,
            other => other,
        };
        Region {
            section: record.section,
            label: record.label,
            text: record.text,
            char_limit,
            bbox: RegionBox::from_xywh(record.x, record.y, record.width, record.height),
        }
    }
}

/// Reads a region list from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid region list.
pub fn read_regions_json(path: &Path) -> Result<Vec<Region>, WiremarkError> {
    let file = File::open(path).map_err(WiremarkError::Io)?;
    let reader = BufReader::new(file);

    let records: Vec<RegionRecord> =
        serde_json::from_reader(reader).map_err(|source| WiremarkError::RegionJsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(records.into_iter().map(Region::from).collect())
}

/// Reads a region list from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_regions_str(json: &str) -> Result<Vec<Region>, serde_json::Error> {
    from_regions_slice(json.as_bytes())
}

/// Reads a region list from raw bytes.
///
/// Useful for fuzzing and for callers that already hold the renderer output.
pub fn from_regions_slice(bytes: &[u8]) -> Result<Vec<Region>, serde_json::Error> {
    let records: Vec<RegionRecord> = serde_json::from_slice(bytes)?;
    Ok(records.into_iter().map(Region::from).collect())
}
