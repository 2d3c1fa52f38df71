// Rollbook - core/export.rs
//
// Sort-for-export and CSV serialisation of a derived RecordSet.
// Core layer: writes to any Write trait object; persisting the artifact is
// the platform layer's job.

use crate::core::date::join_date;
use crate::core::model::{Record, RecordSet};
use crate::util::constants::{DEFAULT_EXPORT_TITLE, EXPORT_EXTENSION};
use crate::util::error::ExportError;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::io::Write;

/// Named CSV bytes ready to hand to an artifact writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, `<ExportTitle>.csv`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Number of data rows (excluding the header).
    pub rows: usize,
}

// =============================================================================
// Sorting
// =============================================================================

/// Stable descending sort by normalised join date (latest first).
///
/// Records whose join date is missing or unparseable go last and keep
/// their relative input order.
pub fn sort_for_export(records: &[Record]) -> RecordSet {
    let mut keyed: Vec<(Option<NaiveDate>, &Record)> =
        records.iter().map(|r| (join_date(r), r)).collect();

    // sort_by is stable: equal keys keep input order.
    keyed.sort_by(|(a, _), (b, _)| compare_join_dates(*a, *b));

    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

fn compare_join_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Write `records` as CSV.
///
/// The header is the key order of the first record and governs every row;
/// a row lacking a header key gets an empty field, keys absent from the
/// header are dropped. Every field is quoted and embedded quotes doubled.
/// An empty input is rejected with `ExportError::NoData`.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<usize, ExportError> {
    let first = records.first().ok_or(ExportError::NoData)?;
    let headers: Vec<&str> = first.keys().collect();

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(&headers)
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for record in records {
        let row = headers
            .iter()
            .map(|h| record.get(h).map(|v| v.render()).unwrap_or_default());
        csv_writer
            .write_record(row)
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Csv {
        source: csv::Error::from(e),
    })?;

    Ok(count)
}

/// Serialise `records` to CSV bytes (no re-sorting).
pub fn to_csv(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(buf)
}

/// Sort by join date, serialise, and name the artifact after `title`.
pub fn prepare_export(records: &[Record], title: &str) -> Result<ExportArtifact, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    let sorted = sort_for_export(records);
    let bytes = to_csv(&sorted)?;
    let file_name = format!("{}.{EXPORT_EXTENSION}", sanitize_title(title));

    tracing::info!(
        file = %file_name,
        rows = sorted.len(),
        bytes = bytes.len(),
        "Export prepared"
    );

    Ok(ExportArtifact {
        file_name,
        bytes,
        rows: sorted.len(),
    })
}

/// Make a title safe to use as a file name stem.
fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_EXPORT_TITLE.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CellValue;

    fn joined(name: &str, month_year: impl Into<CellValue>) -> Record {
        Record::new().with("Name", name).with("Month-Year", month_year)
    }

    fn names(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.get("Name").map(|v| v.render()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_sort_latest_first_nulls_last() {
        let records = vec![
            joined("a", "2023-01"),
            joined("b", CellValue::Empty),
            joined("c", "2024-06"),
        ];
        assert_eq!(names(&sort_for_export(&records)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_keeps_unparseable_in_input_order() {
        let records = vec![
            joined("x1", "garbage"),
            joined("d1", 45000.0),
            Record::new().with("Name", "x2"),
            joined("d2", "2024-01"),
            joined("x3", CellValue::Empty),
        ];
        assert_eq!(
            names(&sort_for_export(&records)),
            vec!["d2", "d1", "x1", "x2", "x3"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let records = vec![
            joined("first", "2024-03"),
            joined("second", "March 2024"),
            joined("third", "2024/03"),
        ];
        assert_eq!(
            names(&sort_for_export(&records)),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_sort_reads_month_names() {
        let records = vec![
            joined("old", "2023-01"),
            joined("new", "May 2024"),
            joined("newer", "September 2024"),
        ];
        assert_eq!(
            names(&sort_for_export(&records)),
            vec!["newer", "new", "old"]
        );
    }

    #[test]
    fn test_csv_quotes_everything_and_doubles_quotes() {
        let records = vec![Record::new().with("A", "x").with("B", "y,\"z\"")];
        let output = String::from_utf8(to_csv(&records).unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec![r#""A","B""#, r#""x","y,""z""""#]);

        // Unquoting recovers the original values.
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "x");
        assert_eq!(&row[1], "y,\"z\"");
    }

    #[test]
    fn test_csv_header_from_first_record() {
        let records = vec![
            Record::new().with("Name", "A").with("Year", 1.0),
            Record::new().with("Year", "2").with("Extra", "dropped"),
        ];
        let output = String::from_utf8(to_csv(&records).unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec![r#""Name","Year""#, r#""A","1""#, r#""","2""#]);
    }

    #[test]
    fn test_empty_set_is_rejected() {
        assert!(matches!(to_csv(&[]), Err(ExportError::NoData)));
        assert!(matches!(
            prepare_export(&[], "Male_Students"),
            Err(ExportError::NoData)
        ));
    }

    #[test]
    fn test_prepare_export_sorts_and_names() {
        let records = vec![joined("old", "2020-01"), joined("new", "2022-01")];
        let artifact = prepare_export(&records, "Male_Students").unwrap();
        assert_eq!(artifact.file_name, "Male_Students.csv");
        assert_eq!(artifact.rows, 2);
        let output = String::from_utf8(artifact.bytes).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], r#""new","2022-01""#);
        assert_eq!(lines[2], r#""old","2020-01""#);
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Search_A/B"), "Search_A_B");
        assert_eq!(sanitize_title("  "), "Filtered_Students");
        assert_eq!(sanitize_title(".."), "Filtered_Students");
    }
}
