// Rollbook - core/fields.rs
//
// Canonical field resolution over source-dependent column spellings.
// Each canonical field owns a fixed, ordered alias list; resolution takes
// the FIRST alias whose key exists in the record, even when that key holds
// an empty value. There is no fallthrough to later aliases and no error
// path: absence yields an empty string.

use crate::core::model::{CellValue, Record};
use std::fmt;

/// Stable internal attribute name behind several accepted raw key spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    RegistrationId,
    Name,
    Gender,
    Division,
    Year,
    Passed,
    Branch,
    Caste,
    Cgpa,
    JoinDate,
}

impl CanonicalField {
    /// All canonical fields in declaration order.
    pub fn all() -> &'static [CanonicalField] {
        &[
            CanonicalField::RegistrationId,
            CanonicalField::Name,
            CanonicalField::Gender,
            CanonicalField::Division,
            CanonicalField::Year,
            CanonicalField::Passed,
            CanonicalField::Branch,
            CanonicalField::Caste,
            CanonicalField::Cgpa,
            CanonicalField::JoinDate,
        ]
    }

    /// Accepted raw key spellings, in resolution order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::RegistrationId => {
                &["Regd No", "Student ID", "RegistrationNumber", "Reg No"]
            }
            CanonicalField::Name => &["Name", "Student Name", "Full Name"],
            CanonicalField::Gender => &["Gender", "gender", "SEX", "Sex"],
            CanonicalField::Division => &["Division", "DIVISION"],
            CanonicalField::Year => &["Year", "YEAR"],
            CanonicalField::Passed => &["Passed", "passed"],
            CanonicalField::Branch => &["Branch", "Department", "BRANCH", "DEPT"],
            CanonicalField::Caste => &["Caste", "caste"],
            CanonicalField::Cgpa => &["CGPA", "cgpa", "Grade Point Average"],
            CanonicalField::JoinDate => &["Month-Year"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::RegistrationId => "Registration ID",
            CanonicalField::Name => "Name",
            CanonicalField::Gender => "Gender",
            CanonicalField::Division => "Division",
            CanonicalField::Year => "Year",
            CanonicalField::Passed => "Passed",
            CanonicalField::Branch => "Branch",
            CanonicalField::Caste => "Caste",
            CanonicalField::Cgpa => "CGPA",
            CanonicalField::JoinDate => "Join Date",
        }
    }

    /// Whether comparisons on this field ignore letter case.
    fn case_folded(self) -> bool {
        matches!(
            self,
            CanonicalField::Gender
                | CanonicalField::Division
                | CanonicalField::Caste
                | CanonicalField::Branch
                | CanonicalField::Passed
                | CanonicalField::RegistrationId
                | CanonicalField::Name
        )
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The raw cell behind the first alias present in `record`.
pub fn resolve_raw(record: &Record, field: CanonicalField) -> Option<&CellValue> {
    field.aliases().iter().find_map(|alias| record.get(alias))
}

/// Resolve `field` to its display string; empty when no alias key exists.
pub fn resolve(record: &Record, field: CanonicalField) -> String {
    resolve_raw(record, field)
        .map(CellValue::render)
        .unwrap_or_default()
}

/// Resolve and normalise for comparison: always trimmed, and lower-cased
/// for the categorical fields.
pub fn normalized(record: &Record, field: CanonicalField) -> String {
    let value = resolve(record, field);
    let trimmed = value.trim();
    if field.case_folded() {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_alias_wins() {
        let record = Record::new()
            .with("Department", "ece")
            .with("Branch", "CSE");
        assert_eq!(resolve(&record, CanonicalField::Branch), "CSE");
    }

    #[test]
    fn test_later_alias_used_when_earlier_absent() {
        let record = Record::new().with("DEPT", "MECH");
        assert_eq!(resolve(&record, CanonicalField::Branch), "MECH");
    }

    #[test]
    fn test_present_but_empty_alias_does_not_fall_through() {
        let record = Record::new()
            .with("Gender", CellValue::Empty)
            .with("Sex", "Female");
        assert_eq!(resolve(&record, CanonicalField::Gender), "");
        assert_eq!(normalized(&record, CanonicalField::Gender), "");
    }

    #[test]
    fn test_absent_field_is_empty() {
        let record = Record::new().with("Name", "Ravi");
        assert_eq!(resolve(&record, CanonicalField::Cgpa), "");
        assert!(resolve_raw(&record, CanonicalField::Cgpa).is_none());
    }

    #[test]
    fn test_numeric_cells_render_as_text() {
        let record = Record::new().with("YEAR", 3.0);
        assert_eq!(resolve(&record, CanonicalField::Year), "3");
    }

    #[test]
    fn test_normalisation_per_field() {
        let record = Record::new()
            .with("Division", "  First Class ")
            .with("Year", " 2 ")
            .with("Passed", "YES ");
        assert_eq!(normalized(&record, CanonicalField::Division), "first class");
        assert_eq!(normalized(&record, CanonicalField::Year), "2");
        assert_eq!(normalized(&record, CanonicalField::Passed), "yes");
    }

    #[test]
    fn test_every_field_has_aliases() {
        for field in CanonicalField::all() {
            assert!(!field.aliases().is_empty(), "{field} has no aliases");
        }
    }
}
