// Rollbook - core/counts.rs
//
// Single-pass summary statistics over a RecordSet. Every counter is driven
// by `QuickFilter::matches`, the same predicate the quick filters use.

use crate::core::filter::QuickFilter;
use crate::core::model::Record;
use serde::Serialize;

/// Fixed-shape aggregate. Categories are not mutually exclusive: one
/// record may bump several division counters at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub male: usize,
    pub female: usize,
    pub distinction: usize,
    pub first: usize,
    pub second: usize,
    pub third: usize,
    pub dist_with_first: usize,
    pub year1: usize,
    pub year2: usize,
    pub year3: usize,
    pub year4: usize,
}

impl Counts {
    /// Tally all categories in one linear pass.
    pub fn tally(records: &[Record]) -> Self {
        let mut counts = Counts::default();
        for record in records {
            for &filter in QuickFilter::all() {
                if filter.matches(record) {
                    *counts.slot_mut(filter) += 1;
                }
            }
        }
        tracing::debug!(records = records.len(), ?counts, "Counts tallied");
        counts
    }

    /// Counter for one category.
    pub fn get(&self, filter: QuickFilter) -> usize {
        match filter {
            QuickFilter::Male => self.male,
            QuickFilter::Female => self.female,
            QuickFilter::Distinction => self.distinction,
            QuickFilter::First => self.first,
            QuickFilter::Second => self.second,
            QuickFilter::Third => self.third,
            QuickFilter::DistWithFirst => self.dist_with_first,
            QuickFilter::Year1 => self.year1,
            QuickFilter::Year2 => self.year2,
            QuickFilter::Year3 => self.year3,
            QuickFilter::Year4 => self.year4,
        }
    }

    fn slot_mut(&mut self, filter: QuickFilter) -> &mut usize {
        match filter {
            QuickFilter::Male => &mut self.male,
            QuickFilter::Female => &mut self.female,
            QuickFilter::Distinction => &mut self.distinction,
            QuickFilter::First => &mut self.first,
            QuickFilter::Second => &mut self.second,
            QuickFilter::Third => &mut self.third,
            QuickFilter::DistWithFirst => &mut self.dist_with_first,
            QuickFilter::Year1 => &mut self.year1,
            QuickFilter::Year2 => &mut self.year2,
            QuickFilter::Year3 => &mut self.year3,
            QuickFilter::Year4 => &mut self.year4,
        }
    }

    /// `(filter, count)` pairs in dashboard order.
    pub fn iter(&self) -> impl Iterator<Item = (QuickFilter, usize)> + '_ {
        QuickFilter::all().iter().map(move |&f| (f, self.get(f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::apply_quick;
    use crate::core::model::CellValue;

    fn mixed_records() -> Vec<Record> {
        vec![
            Record::new()
                .with("Gender", "Male")
                .with("Division", "First Class with Distinction"),
            Record::new()
                .with("Gender", "female")
                .with("Division", "Second Class"),
            Record::new()
                .with("SEX", "M")
                .with("DIVISION", "first class")
                .with("YEAR", 2.0)
                .with("passed", "Yes"),
            Record::new()
                .with("Gender", CellValue::Empty)
                .with("Sex", "F")
                .with("Division", "Third")
                .with("Year", "4")
                .with("Passed", "yes"),
            Record::new()
                .with("gender", "f")
                .with("Division", "Distinction")
                .with("Year", " 1 ")
                .with("Passed", "no"),
            Record::new(),
        ]
    }

    #[test]
    fn test_two_record_example() {
        let records = &mixed_records()[..2];
        let counts = Counts::tally(records);
        assert_eq!(counts.male, 1);
        assert_eq!(counts.female, 1);
        assert_eq!(counts.distinction, 1);
        assert_eq!(counts.dist_with_first, 1);
        assert_eq!(counts.second, 1);
        assert_eq!(counts.first, apply_quick(records, QuickFilter::First).len());
        assert_eq!(counts.first, 1);
    }

    #[test]
    fn test_counts_match_filter_lengths() {
        let records = mixed_records();
        let counts = Counts::tally(&records);
        for &filter in QuickFilter::all() {
            assert_eq!(
                counts.get(filter),
                apply_quick(&records, filter).len(),
                "count mismatch for {filter}"
            );
        }
    }

    #[test]
    fn test_dist_with_first_bounded() {
        let counts = Counts::tally(&mixed_records());
        assert!(counts.dist_with_first <= counts.distinction.min(counts.first));
    }

    #[test]
    fn test_empty_alias_does_not_count() {
        // Record 3 has an empty "Gender" ahead of "Sex": neither male nor female.
        let counts = Counts::tally(&mixed_records());
        assert_eq!(counts.male, 2);
        assert_eq!(counts.female, 2);
        assert_eq!(counts.year2, 1);
        assert_eq!(counts.year4, 1);
        assert_eq!(counts.year1, 0);
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        assert_eq!(Counts::tally(&[]), Counts::default());
    }

    #[test]
    fn test_serialises_camel_case() {
        let json = serde_json::to_string(&Counts::default()).unwrap();
        assert!(json.contains("\"distWithFirst\":0"));
        assert!(json.contains("\"year4\":0"));
    }
}
