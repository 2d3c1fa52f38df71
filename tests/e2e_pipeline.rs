// Rollbook - tests/e2e_pipeline.rs
//
// End-to-end tests for the ingest -> derive -> export pipeline.
//
// These tests use the real fixture files in tests/fixtures/ (a CSV batch
// and a JSON batch using different column spellings), real walkdir
// traversal and a real temporary output directory.

use rollbook::app::ingest::{load_directory, load_file, load_paths, IngestConfig};
use rollbook::app::state::Dashboard;
use rollbook::core::counts::Counts;
use rollbook::core::filter::{apply_quick, CgpaConstraint, FilterCriteria, QuickFilter};
use rollbook::platform::fs::write_artifact;
use rollbook::util::error::ExportError;
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn loaded_dashboard() -> Dashboard {
    let outcome = load_directory(&fixtures_dir(), &IngestConfig::default()).unwrap();
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    let mut dash = Dashboard::new();
    dash.replace_records(outcome.records);
    dash
}

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Ingest
// =============================================================================

#[test]
fn e2e_directory_merges_files_in_name_order() {
    let outcome = load_directory(&fixtures_dir(), &IngestConfig::default()).unwrap();
    assert_eq!(outcome.files.len(), 2);
    assert!(outcome.files[0].ends_with("batch_2023.csv"));
    assert!(outcome.files[1].ends_with("batch_2024.json"));
    assert_eq!(outcome.records.len(), 6);
}

#[test]
fn e2e_single_files_keep_source_columns() {
    let csv = load_file(&fixture("batch_2023.csv")).unwrap();
    assert_eq!(csv.len(), 4);
    assert_eq!(csv[0].keys().next(), Some("Regd No"));

    let json = load_file(&fixture("batch_2024.json")).unwrap();
    assert_eq!(json.len(), 2);
    let keys: Vec<&str> = json[0].keys().collect();
    assert_eq!(keys[0], "Student ID");
    assert_eq!(keys[9], "Month-Year");
}

#[test]
fn e2e_bad_file_in_directory_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture("batch_2023.csv"), dir.path().join("a.csv")).unwrap();
    fs::write(dir.path().join("b.json"), "{\"not\": \"an array\"").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let outcome = load_paths(&[dir.path().to_path_buf()], &IngestConfig::default()).unwrap();
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.warnings.len(), 1);
}

// =============================================================================
// Counts and filters
// =============================================================================

#[test]
fn e2e_counts_across_alias_variants() {
    let dash = loaded_dashboard();
    let counts = dash.counts();
    assert_eq!(
        counts,
        Counts {
            male: 3,
            female: 3,
            distinction: 2,
            first: 3,
            second: 1,
            third: 1,
            dist_with_first: 1,
            year1: 2,
            year2: 1,
            year3: 1,
            year4: 1,
        }
    );

    for &filter in QuickFilter::all() {
        assert_eq!(
            counts.get(filter),
            apply_quick(dash.records(), filter).len(),
            "count mismatch for {filter}"
        );
    }
}

#[test]
fn e2e_filter_options() {
    let options = loaded_dashboard().options();
    assert_eq!(options.years, vec!["1", "2", "3", "4"]);
    assert_eq!(options.branches, vec!["CSE", "ECE", "EEE", "MECH"]);
    assert_eq!(options.castes, vec!["BC", "OC", "SC"]);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_quick_filter_export_sorted_by_join_date() {
    let mut dash = loaded_dashboard();
    assert_eq!(dash.select_quick(QuickFilter::First).len(), 3);

    let artifact = dash.export().unwrap();
    assert_eq!(artifact.file_name, "First_Class_Students.csv");
    assert_eq!(artifact.rows, 3);

    let out = tempfile::tempdir().unwrap();
    let path = write_artifact(out.path(), &artifact.file_name, &artifact.bytes).unwrap();
    let written = fs::read(&path).unwrap();
    assert_eq!(written, artifact.bytes);

    let rows = lines(&written);
    assert_eq!(rows.len(), 4);
    // Priya joined 2024-01-01 (spreadsheet serial), so her record leads and
    // its keys become the header.
    assert!(rows[0].starts_with("\"Student ID\",\"Student Name\""));
    assert!(rows[1].starts_with("\"22EE011\",\"Priya \"\"PN\"\" Nair\""));
    // CSV-sourced rows have no "Student ID" column, so it stays empty.
    assert!(rows[2].starts_with("\"\",\"\""));
}

#[test]
fn e2e_criteria_export_title_and_rows() {
    let mut dash = loaded_dashboard();
    let criteria = FilterCriteria {
        branch: Some("cse".to_string()),
        cgpa: Some(CgpaConstraint::parse(">8").unwrap()),
        ..Default::default()
    };
    assert_eq!(dash.apply_criteria(&criteria).len(), 3);
    assert_eq!(dash.export_title(), "cse_CGPA_above_8_Students");

    let artifact = dash.export().unwrap();
    assert_eq!(artifact.file_name, "cse_CGPA_above_8_Students.csv");
    let rows = lines(&artifact.bytes);
    assert!(rows[1].starts_with("\"22CS010\",\"Nikhil Jain\""));
}

#[test]
fn e2e_search_and_empty_export() {
    let mut dash = loaded_dashboard();
    assert_eq!(dash.search("NAIR").len(), 1);
    assert_eq!(dash.export_title(), "Search_Nair");

    assert!(dash.search("nobody-here").is_empty());
    assert!(matches!(dash.export(), Err(ExportError::NoData)));
}
