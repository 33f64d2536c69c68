//! Report rows: one per ordered region, keyed by the image identifiers.
//!
//! Rows are built from the same [`IdentifierMap`] as the image labels, so
//! the report and the annotated image cannot disagree. Labels are kept in
//! full here; only the on-image text is shortened.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::WiremarkError;
use crate::ir::{CharLimit, Identifier, IdentifierMap, OrderedRegion};

/// Column titles of the CSV report, in order.
pub const CSV_HEADER: [&str; 5] = ["ID", "Section", "Label", "Reference Text", "Char Limit"];

/// One report row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: Identifier,
    pub section: String,
    pub label: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_limit: Option<CharLimit>,
}

/// Flat CSV record; the limit is rendered as text so counts and ranges
/// share one column.
#[derive(Serialize)]
struct CsvRecord<'a> {
    id: &'a str,
    section: &'a str,
    label: &'a str,
    text: &'a str,
    char_limit: String,
}

impl<'a> From<&'a ReportRow> for CsvRecord<'a> {
    fn from(row: &'a ReportRow) -> Self {
        CsvRecord {
            id: row.id.as_str(),
            section: &row.section,
            label: &row.label,
            text: &row.text,
            char_limit: row
                .char_limit
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

/// Builds report rows in rank order.
pub fn build_rows(regions: &[OrderedRegion], identifiers: &IdentifierMap) -> Vec<ReportRow> {
    regions
        .iter()
        .zip(identifiers.iter())
        .map(|(region, id)| ReportRow {
            id: id.clone(),
            section: region.section.clone(),
            label: region.label.clone(),
            text: region.text.clone(),
            char_limit: region.char_limit.clone(),
        })
        .collect()
}

fn write_csv<W: Write>(writer: W, rows: &[ReportRow], path: &Path) -> Result<W, WiremarkError> {
    let csv_err = |source| WiremarkError::ReportCsvWrite {
        path: path.to_path_buf(),
        source,
    };

    // Header written by hand so an empty report still has one.
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for row in rows {
        csv_writer.serialize(CsvRecord::from(row)).map_err(csv_err)?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| WiremarkError::Io(e.into_error()))
}

/// Report file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    /// Picks the format from a file extension (`.csv` or `.json`).
    pub fn from_path(path: &Path) -> Result<Self, WiremarkError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(ReportFormat::Csv),
            Some("json") => Ok(ReportFormat::Json),
            _ => Err(WiremarkError::UnsupportedFormat(format!(
                "report '{}' (supported extensions: .csv, .json)",
                path.display()
            ))),
        }
    }
}

/// Writes the report to `writer`; `path` only names the target in errors.
pub fn write_report<W: Write>(
    writer: W,
    format: ReportFormat,
    rows: &[ReportRow],
    path: &Path,
) -> Result<(), WiremarkError> {
    match format {
        ReportFormat::Csv => write_csv(writer, rows, path)?
            .flush()
            .map_err(WiremarkError::Io),
        ReportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows).map_err(|source| {
                WiremarkError::ReportJsonWrite {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            writer.flush().map_err(WiremarkError::Io)
        }
    }
}

/// Renders the report as a CSV string.
pub fn to_report_csv_string(rows: &[ReportRow]) -> Result<String, WiremarkError> {
    let bytes = write_csv(Vec::new(), rows, Path::new("<string>"))?;
    String::from_utf8(bytes)
        .map_err(|e| WiremarkError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{order_regions, IdentifierAlphabet, Region, RegionBox};

    fn rows() -> Vec<ReportRow> {
        let ordered = order_regions(vec![
            Region::new("Lead, long", RegionBox::from_xywh(0.0, 300.0, 10.0, 10.0))
                .with_section("About")
                .with_text("We build \"things\"")
                .with_char_limit(CharLimit::Text("20-30".into())),
            Region::new("Title", RegionBox::from_xywh(0.0, 10.0, 10.0, 10.0))
                .with_char_limit(CharLimit::Count(15.into())),
        ])
        .unwrap();
        let ids = IdentifierAlphabet::default().assign(&ordered);
        build_rows(&ordered, &ids)
    }

    #[test]
    fn test_rows_follow_rank_order() {
        let rows = rows();
        assert_eq!(rows[0].id.as_str(), "①");
        assert_eq!(rows[0].label, "Title");
        assert_eq!(rows[1].id.as_str(), "②");
        assert_eq!(rows[1].section, "About");
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_report_csv_string(&rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Section,Label,Reference Text,Char Limit");
        assert_eq!(lines[1], "①,,Title,,15");
        assert_eq!(
            lines[2],
            "②,About,\"Lead, long\",\"We build \"\"things\"\"\",20-30"
        );
    }

    #[test]
    fn test_empty_report_keeps_header() {
        let csv = to_report_csv_string(&[]).unwrap();
        assert_eq!(csv, "ID,Section,Label,Reference Text,Char Limit\n");
    }

    #[test]
    fn test_json_rows() {
        let value = serde_json::to_value(rows()).unwrap();
        assert_eq!(value[0]["id"], "①");
        assert_eq!(value[0]["char_limit"], 15);
        assert_eq!(value[1]["char_limit"], "20-30");
    }

    #[test]
    fn test_write_report_json() {
        let mut out = Vec::new();
        write_report(&mut out, ReportFormat::Json, &rows(), Path::new("report.json")).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["label"], "Title");
    }

    #[test]
    fn test_fractional_limit_keeps_its_text() {
        let limit: CharLimit = serde_json::from_str("80.0").unwrap();
        let ordered = order_regions(vec![Region::new(
            "Lead",
            RegionBox::from_xywh(0.0, 0.0, 10.0, 10.0),
        )
        .with_char_limit(limit)])
        .unwrap();
        let rows = build_rows(&ordered, &IdentifierAlphabet::default().assign(&ordered));

        let csv = to_report_csv_string(&rows).unwrap();
        assert_eq!(csv.lines().nth(1), Some("①,,Lead,,80.0"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ReportFormat::from_path(Path::new("out/report.CSV")).unwrap(),
            ReportFormat::Csv
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("report.json")).unwrap(),
            ReportFormat::Json
        );
        assert!(matches!(
            ReportFormat::from_path(Path::new("report.xlsx")),
            Err(WiremarkError::UnsupportedFormat(_))
        ));
        assert!(ReportFormat::from_path(Path::new("report")).is_err());
    }
}
