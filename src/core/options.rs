// Rollbook - core/options.rs
//
// Distinct values offered by the multi-criteria filter's pickers.

use crate::core::fields::{resolve, CanonicalField};
use crate::core::model::Record;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Sorted, de-duplicated, non-empty choices per pickable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Trimmed year values.
    pub years: Vec<String>,
    /// Trimmed, upper-cased branch names.
    pub branches: Vec<String>,
    /// Trimmed castes; the first spelling seen wins among case variants.
    pub castes: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[Record]) -> Self {
        let mut years = BTreeSet::new();
        let mut branches = BTreeSet::new();
        // lower-cased key -> first spelling seen
        let mut castes: BTreeMap<String, String> = BTreeMap::new();

        for record in records {
            let year = resolve(record, CanonicalField::Year);
            let year = year.trim();
            if !year.is_empty() {
                years.insert(year.to_string());
            }

            let branch = resolve(record, CanonicalField::Branch);
            let branch = branch.trim();
            if !branch.is_empty() {
                branches.insert(branch.to_uppercase());
            }

            let caste = resolve(record, CanonicalField::Caste);
            let caste = caste.trim();
            if !caste.is_empty() {
                castes
                    .entry(caste.to_lowercase())
                    .or_insert_with(|| caste.to_string());
            }
        }

        let mut castes: Vec<String> = castes.into_values().collect();
        castes.sort();

        Self {
            years: years.into_iter().collect(),
            branches: branches.into_iter().collect(),
            castes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_sorted_values() {
        let records = vec![
            Record::new().with("Year", "3").with("Branch", " cse").with("Caste", "OC"),
            Record::new().with("YEAR", 1.0).with("DEPT", "ECE").with("caste", "bc"),
            Record::new().with("Year", " 3 ").with("Department", "CSE ").with("Caste", "oc"),
            Record::new().with("Year", "").with("Branch", "  "),
        ];
        let options = FilterOptions::from_records(&records);
        assert_eq!(options.years, vec!["1", "3"]);
        assert_eq!(options.branches, vec!["CSE", "ECE"]);
        assert_eq!(options.castes, vec!["OC", "bc"]);
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(FilterOptions::from_records(&[]), FilterOptions::default());
    }
}
