//! Region list validation.
//!
//! This module checks a captured region list before it is rendered:
//! - Geometric validity (finite boxes, non-negative sizes)
//! - Data quality (non-empty labels)
//! - Fit (inside the base image, no overlaps, enough identifier symbols)
//!
//! Errors mirror what ordering would reject. Warnings describe inputs that
//! render, but probably not the way the author intended.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::ir::{Region, CIRCLED_NUMERALS};

/// Options for validation behavior.
#[derive(Clone, Debug)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
    /// Number of identifier symbols before the overflow template kicks in.
    pub alphabet_len: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strict: false,
            alphabet_len: CIRCLED_NUMERALS.len(),
        }
    }
}

/// Validates a region list and returns a report of all issues found.
///
/// `image_size` enables the bounds check. Regions are identified by their
/// position in the input, not by rank, so issues point at the source file.
pub fn validate_regions(
    regions: &[Region],
    image_size: Option<(u32, u32)>,
    opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    let mut drawable = Vec::with_capacity(regions.len());
    for (index, region) in regions.iter().enumerate() {
        if validate_region(index, region, image_size, &mut report) {
            drawable.push(index);
        }
    }

    validate_overlaps(regions, &drawable, &mut report);

    if regions.len() > opts.alphabet_len {
        report.add(ValidationIssue::warning(
            IssueCode::IdentifierOverflow,
            format!(
                "{} regions but only {} identifier symbols; regions from rank {} use the overflow template",
                regions.len(),
                opts.alphabet_len,
                opts.alphabet_len + 1
            ),
            IssueContext::RegionList,
        ));
    }

    report
}

/// Checks one region. Returns true if its box can be drawn.
fn validate_region(
    index: usize,
    region: &Region,
    image_size: Option<(u32, u32)>,
    report: &mut ValidationReport,
) -> bool {
    let context = || IssueContext::Region {
        index,
        label: region.label.clone(),
    };
    let bbox = &region.bbox;

    if region.label.trim().is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::EmptyLabel,
            "Empty label",
            context(),
        ));
    }

    // Skip further box checks if coordinates are invalid
    if !bbox.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::BoxNotFinite,
            format!(
                "Non-finite box (x={}, y={}, width={}, height={})",
                bbox.x(),
                bbox.y(),
                bbox.width,
                bbox.height
            ),
            context(),
        ));
        return false;
    }

    if bbox.has_negative_size() {
        report.add(ValidationIssue::error(
            IssueCode::NegativeSize,
            format!("Negative size {}x{}", bbox.width, bbox.height),
            context(),
        ));
        return false;
    }

    if let Some((width, height)) = image_size {
        if !bbox.fits_within(width, height) {
            report.add(ValidationIssue::warning(
                IssueCode::RegionOutOfBounds,
                format!(
                    "Box ({:.1}, {:.1}, {:.1}, {:.1}) extends outside image bounds (0, 0, {}, {})",
                    bbox.x(),
                    bbox.y(),
                    bbox.right(),
                    bbox.bottom(),
                    width,
                    height
                ),
                context(),
            ));
        }
    }

    true
}

/// Reports each overlapping pair once, against the later region.
fn validate_overlaps(regions: &[Region], drawable: &[usize], report: &mut ValidationReport) {
    for (pos, &later) in drawable.iter().enumerate() {
        for &earlier in &drawable[..pos] {
            if regions[later].bbox.overlaps(&regions[earlier].bbox) {
                report.add(ValidationIssue::warning(
                    IssueCode::OverlappingRegions,
                    format!(
                        "Overlaps region {} ('{}')",
                        earlier, regions[earlier].label
                    ),
                    IssueContext::Region {
                        index: later,
                        label: regions[later].label.clone(),
                    },
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RegionBox;

    fn region(label: &str, x: f64, y: f64, w: f64, h: f64) -> Region {
        Region::new(label, RegionBox::from_xywh(x, y, w, h))
    }

    fn valid_regions() -> Vec<Region> {
        vec![
            region("Title", 10.0, 10.0, 200.0, 40.0),
            region("Lead", 10.0, 60.0, 300.0, 80.0),
        ]
    }

    fn has(report: &ValidationReport, code: IssueCode) -> bool {
        report.issues.iter().any(|i| i.code == code)
    }

    #[test]
    fn test_valid_regions() {
        let report = validate_regions(
            &valid_regions(),
            Some((640, 480)),
            &ValidateOptions::default(),
        );
        assert!(
            report.is_clean(),
            "Expected no issues, got: {:?}",
            report.issues
        );
    }

    #[test]
    fn test_negative_size_is_error() {
        let mut regions = valid_regions();
        regions.push(region("Bad", 0.0, 200.0, 10.0, -1.0));

        let report = validate_regions(&regions, None, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(has(&report, IssueCode::NegativeSize));
    }

    #[test]
    fn test_non_finite_is_error() {
        let regions = vec![region("NaN", f64::NAN, 0.0, 10.0, 10.0)];
        let report = validate_regions(&regions, None, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(has(&report, IssueCode::BoxNotFinite));
    }

    #[test]
    fn test_empty_label_is_warning() {
        let regions = vec![region("  ", 0.0, 0.0, 10.0, 10.0)];
        let report = validate_regions(&regions, None, &ValidateOptions::default());
        assert_eq!(report.warning_count(), 1);
        assert!(report.is_ok());
        assert!(has(&report, IssueCode::EmptyLabel));
    }

    #[test]
    fn test_out_of_bounds_needs_image_size() {
        let regions = vec![region("Wide", 600.0, 10.0, 100.0, 10.0)];
        let opts = ValidateOptions::default();

        assert!(validate_regions(&regions, None, &opts).is_clean());
        let report = validate_regions(&regions, Some((640, 480)), &opts);
        assert!(has(&report, IssueCode::RegionOutOfBounds));
    }

    #[test]
    fn test_overlap_reported_once_per_pair() {
        let regions = vec![
            region("A", 0.0, 0.0, 100.0, 100.0),
            region("B", 50.0, 50.0, 100.0, 100.0),
            region("C", 100.0, 300.0, 10.0, 10.0),
        ];
        let report = validate_regions(&regions, None, &ValidateOptions::default());
        let overlaps: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.code == IssueCode::OverlappingRegions)
            .collect();
        assert_eq!(overlaps.len(), 1);
        assert!(matches!(
            overlaps[0].context,
            IssueContext::Region { index: 1, .. }
        ));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let regions = vec![
            region("A", 0.0, 0.0, 100.0, 50.0),
            region("B", 0.0, 50.0, 100.0, 50.0),
        ];
        let report = validate_regions(&regions, None, &ValidateOptions::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_identifier_overflow_warning() {
        let regions: Vec<Region> = (0..3)
            .map(|i| region("R", 0.0, i as f64 * 20.0, 10.0, 10.0))
            .collect();
        let opts = ValidateOptions {
            strict: false,
            alphabet_len: 2,
        };
        let report = validate_regions(&regions, None, &opts);
        assert_eq!(report.warning_count(), 1);
        assert!(has(&report, IssueCode::IdentifierOverflow));
    }
}
