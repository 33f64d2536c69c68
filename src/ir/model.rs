//! Region model: labeled rectangles and their canonical ordering.
//!
//! Regions are produced by whatever captured the page (a browser, a design
//! tool export) and are treated as immutable from then on. The only
//! transformation this module performs is ordering them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::bbox::RegionBox;
use super::space::ImageSpace;
use crate::error::WiremarkError;

/// One labeled area of interest on the captured page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    /// Free-text grouping name (may be empty).
    pub section: String,

    /// Short display name of the element.
    pub label: String,

    /// Reference content found in the element; carried through to the report.
    pub text: String,

    /// Optional length guidance for the copy that replaces `text`.
    pub char_limit: Option<CharLimit>,

    /// Position and size in base image pixels.
    pub bbox: RegionBox<ImageSpace>,
}

impl Region {
    /// Creates a region with empty section, text and no character limit.
    pub fn new(label: impl Into<String>, bbox: RegionBox<ImageSpace>) -> Self {
        Self {
            label: label.into(),
            bbox,
            ..Default::default()
        }
    }

    /// Sets the section name.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Sets the reference text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the character limit.
    pub fn with_char_limit(mut self, limit: CharLimit) -> Self {
        self.char_limit = Some(limit);
        self
    }
}

/// A length constraint attached to a region.
///
/// Page authors write either a plain number or a free-form hint such as
/// `"20-30"`; both are passed through untouched. Any JSON number is kept
/// as written, including `80.0` or `-1` from spreadsheet exports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharLimit {
    Count(serde_json::Number),
    Text(String),
}

impl fmt::Display for CharLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharLimit::Count(n) => write!(f, "{}", n),
            CharLimit::Text(s) => f.write_str(s),
        }
    }
}

/// A region together with its rank in the canonical ordering.
///
/// The rank drives identifier assignment, color choice, drawing order and
/// report row order, so it is computed exactly once per run.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedRegion {
    /// 0-based position after the stable y-ascending sort.
    pub rank: usize,

    /// The captured region, unchanged.
    pub region: Region,
}

impl std::ops::Deref for OrderedRegion {
    type Target = Region;

    fn deref(&self) -> &Region {
        &self.region
    }
}

/// Orders regions top to bottom and assigns ranks.
///
/// The sort is stable on `bbox.y`, so regions sharing a top edge keep the
/// order in which they were discovered. No filtering happens here.
///
/// # Errors
/// Returns [`WiremarkError::InvalidRegion`] if any region has a negative
/// width or height, or a non-finite coordinate. The whole batch is rejected
/// so that report rows and image labels can never drift apart.
pub fn order_regions(regions: Vec<Region>) -> Result<Vec<OrderedRegion>, WiremarkError> {
    for (index, region) in regions.iter().enumerate() {
        let bbox = &region.bbox;
        let reason = if !bbox.is_finite() {
            Some("non-finite coordinates".to_string())
        } else if bbox.has_negative_size() {
            Some(format!("negative size {}x{}", bbox.width, bbox.height))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(WiremarkError::InvalidRegion {
                index,
                label: region.label.clone(),
                reason,
            });
        }
    }

    let mut regions = regions;
    // sort_by is stable; all values are finite at this point
    regions.sort_by(|a, b| a.bbox.y().total_cmp(&b.bbox.y()));

    Ok(regions
        .into_iter()
        .enumerate()
        .map(|(rank, region)| OrderedRegion { rank, region })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_at(label: &str, y: f64) -> Region {
        Region::new(label, RegionBox::from_xywh(0.0, y, 10.0, 10.0))
    }

    #[test]
    fn test_orders_by_top_edge() {
        let ordered = order_regions(vec![
            region_at("b", 50.0),
            region_at("a", 10.0),
            region_at("c", 200.0),
        ])
        .unwrap();

        let labels: Vec<&str> = ordered.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        let ranks: Vec<usize> = ordered.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, [0, 1, 2]);
    }

    #[test]
    fn test_equal_tops_keep_discovery_order() {
        let ordered = order_regions(vec![
            region_at("first", 30.0),
            region_at("second", 30.0),
            region_at("top", 0.0),
            region_at("third", 30.0),
        ])
        .unwrap();

        let labels: Vec<&str> = ordered.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["top", "first", "second", "third"]);
    }

    #[test]
    fn test_negative_height_rejects_batch() {
        let bad = Region::new("bad", RegionBox::from_xywh(0.0, 0.0, 10.0, -1.0));
        let err = order_regions(vec![region_at("ok", 0.0), bad]).unwrap_err();
        match err {
            WiremarkError::InvalidRegion { index, label, .. } => {
                assert_eq!(index, 1);
                assert_eq!(label, "bad");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nan_coordinate_is_invalid() {
        let bad = Region::new("nan", RegionBox::from_xywh(0.0, f64::NAN, 10.0, 10.0));
        assert!(matches!(
            order_regions(vec![bad]),
            Err(WiremarkError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_zero_size_is_allowed() {
        let flat = Region::new("flat", RegionBox::from_xywh(0.0, 0.0, 0.0, 0.0));
        assert_eq!(order_regions(vec![flat]).unwrap().len(), 1);
    }

    #[test]
    fn test_char_limit_display() {
        assert_eq!(CharLimit::Count(20.into()).to_string(), "20");
        assert_eq!(CharLimit::Text("20-30".into()).to_string(), "20-30");
    }
}
