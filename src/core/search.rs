// Rollbook - core/search.rs
//
// Free-text lookup by registration number or name.

use crate::core::fields::{normalized, CanonicalField};
use crate::core::filter::capitalize_first;
use crate::core::model::{Record, RecordSet};

/// Case-insensitive substring search over RegistrationId and Name.
///
/// An empty (or all-whitespace) query returns an empty result, never the
/// full set.
pub fn search(records: &[Record], query: &str) -> RecordSet {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return RecordSet::new();
    }

    let result: RecordSet = records
        .iter()
        .filter(|r| {
            normalized(r, CanonicalField::RegistrationId).contains(&term)
                || normalized(r, CanonicalField::Name).contains(&term)
        })
        .cloned()
        .collect();
    tracing::debug!(input = records.len(), matched = result.len(), "Search applied");
    result
}

/// Export title for a search, e.g. `Search_Ravi`.
pub fn search_title(query: &str) -> String {
    format!("Search_{}", capitalize_first(&query.trim().to_lowercase()))
}
