// Rollbook - app/state.rs
//
// Dashboard state: the current RecordSet snapshot plus the most recently
// derived view and its export title. Every transition replaces whole
// values; the snapshot itself is never edited in place.

use crate::core::counts::Counts;
use crate::core::export::{prepare_export, ExportArtifact};
use crate::core::filter::{apply_criteria, apply_quick, FilterCriteria, QuickFilter};
use crate::core::model::{Record, RecordSet};
use crate::core::options::FilterOptions;
use crate::core::search::{search, search_title};
use crate::util::constants::DEFAULT_EXPORT_TITLE;
use crate::util::error::ExportError;
use std::sync::Arc;

/// Top-level dashboard state.
#[derive(Debug, Default)]
pub struct Dashboard {
    /// Current ingestion snapshot, shared read-only with derive calls.
    records: Arc<RecordSet>,

    /// Records selected by the last quick filter, criteria filter or search.
    view: RecordSet,

    /// Export title for `view`.
    export_title: String,

    /// Status line for the front end.
    pub status_message: String,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            status_message: "Ready. Load a record file to begin.".to_string(),
            ..Default::default()
        }
    }

    /// Swap in a freshly ingested RecordSet. The previous view no longer
    /// refers to current data, so it is cleared.
    pub fn replace_records(&mut self, records: RecordSet) {
        tracing::info!(records = records.len(), "Record set replaced");
        self.status_message = format!("{} records loaded.", records.len());
        self.records = Arc::new(records);
        self.clear_view();
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn view(&self) -> &[Record] {
        &self.view
    }

    pub fn export_title(&self) -> &str {
        if self.export_title.is_empty() {
            DEFAULT_EXPORT_TITLE
        } else {
            &self.export_title
        }
    }

    pub fn counts(&self) -> Counts {
        Counts::tally(&self.records)
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }

    /// Select a quick-filter category as the current view.
    pub fn select_quick(&mut self, filter: QuickFilter) -> &[Record] {
        let view = apply_quick(&self.records, filter);
        self.set_view(view, filter.export_title().to_string())
    }

    /// Apply the multi-criteria filter as the current view.
    pub fn apply_criteria(&mut self, criteria: &FilterCriteria) -> &[Record] {
        let view = apply_criteria(&self.records, criteria);
        self.set_view(view, criteria.export_title())
    }

    /// Search by registration number or name. A blank query leaves the
    /// current view untouched.
    pub fn search(&mut self, query: &str) -> &[Record] {
        if query.trim().is_empty() {
            return &self.view;
        }
        let view = search(&self.records, query);
        self.set_view(view, search_title(query))
    }

    pub fn clear_view(&mut self) {
        self.view = RecordSet::new();
        self.export_title.clear();
    }

    /// Produce the CSV artifact for the current view.
    pub fn export(&self) -> Result<ExportArtifact, ExportError> {
        prepare_export(&self.view, self.export_title())
    }

    fn set_view(&mut self, view: RecordSet, title: String) -> &[Record] {
        self.status_message = format!(
            "{} of {} records match ({title}).",
            view.len(),
            self.records.len()
        );
        self.view = view;
        self.export_title = title;
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{CgpaConstraint, CgpaOp};

    fn sample() -> RecordSet {
        vec![
            Record::new()
                .with("Name", "Ravi")
                .with("Gender", "M")
                .with("CGPA", 8.9)
                .with("Month-Year", "2022-08"),
            Record::new()
                .with("Name", "Asha")
                .with("Gender", "F")
                .with("CGPA", 9.1)
                .with("Month-Year", "2023-08"),
        ]
    }

    #[test]
    fn test_new_dashboard_has_no_view() {
        let dash = Dashboard::new();
        assert!(dash.records().is_empty());
        assert!(dash.view().is_empty());
        assert_eq!(dash.export_title(), "Filtered_Students");
        assert!(matches!(dash.export(), Err(ExportError::NoData)));
    }

    #[test]
    fn test_quick_filter_sets_view_and_title() {
        let mut dash = Dashboard::new();
        dash.replace_records(sample());
        assert_eq!(dash.select_quick(QuickFilter::Female).len(), 1);
        assert_eq!(dash.export_title(), "Female_Students");
        let artifact = dash.export().unwrap();
        assert_eq!(artifact.file_name, "Female_Students.csv");
    }

    #[test]
    fn test_replace_records_clears_view() {
        let mut dash = Dashboard::new();
        dash.replace_records(sample());
        dash.select_quick(QuickFilter::Male);
        dash.replace_records(vec![Record::new().with("Name", "New")]);
        assert!(dash.view().is_empty());
        assert_eq!(dash.export_title(), "Filtered_Students");
        assert_eq!(dash.records().len(), 1);
    }

    #[test]
    fn test_criteria_and_search_titles() {
        let mut dash = Dashboard::new();
        dash.replace_records(sample());
        let criteria = FilterCriteria {
            cgpa: Some(CgpaConstraint::new(CgpaOp::Gt, 9.0)),
            ..Default::default()
        };
        assert_eq!(dash.apply_criteria(&criteria).len(), 1);
        assert_eq!(dash.export_title(), "CGPA_above_9_Students");

        assert_eq!(dash.search("rav").len(), 1);
        assert_eq!(dash.export_title(), "Search_Rav");

        // Blank search keeps the previous view.
        assert_eq!(dash.search("  ").len(), 1);
        assert_eq!(dash.export_title(), "Search_Rav");
    }

    #[test]
    fn test_empty_view_export_is_no_data() {
        let mut dash = Dashboard::new();
        dash.replace_records(sample());
        dash.search("nobody");
        assert!(matches!(dash.export(), Err(ExportError::NoData)));
    }

    #[test]
    fn test_counts_derived_from_snapshot() {
        let mut dash = Dashboard::new();
        dash.replace_records(sample());
        let counts = dash.counts();
        assert_eq!(counts.male, 1);
        assert_eq!(counts.female, 1);
        dash.select_quick(QuickFilter::Male);
        assert_eq!(dash.counts(), counts);
    }
}
