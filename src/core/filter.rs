// Rollbook - core/filter.rs
//
// Record classification and filtering.
//
// Two entry points:
//   - quick filters: predefined single-category predicates selected by name
//   - criteria filters: up to five optional constraints, AND-combined
//
// The quick-filter predicates are the single definition of each category;
// core::counts tallies with the same `QuickFilter::matches`, so a category
// count always equals the length of the corresponding filter result.
//
// Core layer: pure logic, no I/O. Absent or malformed fields simply fail
// a predicate, they never raise.

use crate::core::fields::{normalized, resolve, CanonicalField};
use crate::core::model::{CellValue, Record, RecordSet};
use crate::util::constants::DEFAULT_EXPORT_TITLE;
use crate::util::error::FilterError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// =============================================================================
// Quick filters
// =============================================================================

/// Predefined single-category predicates.
///
/// Categories overlap: "First Class with Distinction" is counted under
/// `Distinction`, `First` and `DistWithFirst` at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickFilter {
    Male,
    Female,
    Distinction,
    First,
    Second,
    Third,
    DistWithFirst,
    Year1,
    Year2,
    Year3,
    Year4,
}

impl QuickFilter {
    /// All quick filters in dashboard order.
    pub fn all() -> &'static [QuickFilter] {
        &[
            QuickFilter::Male,
            QuickFilter::Female,
            QuickFilter::Distinction,
            QuickFilter::First,
            QuickFilter::Second,
            QuickFilter::Third,
            QuickFilter::DistWithFirst,
            QuickFilter::Year1,
            QuickFilter::Year2,
            QuickFilter::Year3,
            QuickFilter::Year4,
        ]
    }

    /// Selector name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            QuickFilter::Male => "male",
            QuickFilter::Female => "female",
            QuickFilter::Distinction => "distinction",
            QuickFilter::First => "first",
            QuickFilter::Second => "second",
            QuickFilter::Third => "third",
            QuickFilter::DistWithFirst => "distWithFirst",
            QuickFilter::Year1 => "year1",
            QuickFilter::Year2 => "year2",
            QuickFilter::Year3 => "year3",
            QuickFilter::Year4 => "year4",
        }
    }

    /// Human-readable card label.
    pub fn label(self) -> &'static str {
        match self {
            QuickFilter::Male => "Male Students",
            QuickFilter::Female => "Female Students",
            QuickFilter::Distinction => "Distinction",
            QuickFilter::First => "First",
            QuickFilter::Second => "Second",
            QuickFilter::Third => "Third",
            QuickFilter::DistWithFirst => "Distinction + 1st Class",
            QuickFilter::Year1 => "1st Year - Passed Students",
            QuickFilter::Year2 => "2nd Year - Passed Students",
            QuickFilter::Year3 => "3rd Year - Passed Students",
            QuickFilter::Year4 => "4th Year - Passed Students",
        }
    }

    /// Export title (download filename stem) for this category.
    pub fn export_title(self) -> &'static str {
        match self {
            QuickFilter::Male => "Male_Students",
            QuickFilter::Female => "Female_Students",
            QuickFilter::Distinction => "Distinction_Students",
            QuickFilter::First => "First_Class_Students",
            QuickFilter::Second => "Second_Class_Students",
            QuickFilter::Third => "Third_Class_Students",
            QuickFilter::DistWithFirst => "Distinction_and_First_Class_Students",
            QuickFilter::Year1 => "1st_Year_Passed_Students",
            QuickFilter::Year2 => "2nd_Year_Passed_Students",
            QuickFilter::Year3 => "3rd_Year_Passed_Students",
            QuickFilter::Year4 => "4th_Year_Passed_Students",
        }
    }

    /// Whether `record` belongs to this category.
    pub fn matches(self, record: &Record) -> bool {
        match self {
            QuickFilter::Male => normalized(record, CanonicalField::Gender).starts_with('m'),
            QuickFilter::Female => normalized(record, CanonicalField::Gender).starts_with('f'),
            QuickFilter::Distinction => division(record).contains("distinction"),
            // Inclusive: a distinction record mentioning "first" is also first.
            QuickFilter::First => division(record).contains("first"),
            QuickFilter::Second => division(record).contains("second"),
            QuickFilter::Third => division(record).contains("third"),
            QuickFilter::DistWithFirst => {
                let div = division(record);
                div.contains("distinction") && div.contains("first")
            }
            QuickFilter::Year1 => passed_in_year(record, "1"),
            QuickFilter::Year2 => passed_in_year(record, "2"),
            QuickFilter::Year3 => passed_in_year(record, "3"),
            QuickFilter::Year4 => passed_in_year(record, "4"),
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuickFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['_', '-'], "").to_lowercase();
        QuickFilter::all()
            .iter()
            .copied()
            .find(|q| q.name().to_lowercase() == wanted)
            .ok_or_else(|| FilterError::UnknownQuickFilter {
                name: s.to_string(),
            })
    }
}

fn division(record: &Record) -> String {
    normalized(record, CanonicalField::Division)
}

fn passed_in_year(record: &Record, year: &str) -> bool {
    normalized(record, CanonicalField::Year) == year
        && normalized(record, CanonicalField::Passed) == "yes"
}

/// Records matching `filter`, in original order.
pub fn apply_quick(records: &[Record], filter: QuickFilter) -> RecordSet {
    let result: RecordSet = records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();
    tracing::debug!(
        filter = filter.name(),
        input = records.len(),
        matched = result.len(),
        "Quick filter applied"
    );
    result
}

// =============================================================================
// CGPA constraint
// =============================================================================

/// Comparison applied between a record's CGPA and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgpaOp {
    Eq,
    Gt,
    Lt,
}

/// CGPA equality or relational constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgpaConstraint {
    pub op: CgpaOp,
    pub threshold: f64,
}

impl CgpaConstraint {
    pub fn new(op: CgpaOp, threshold: f64) -> Self {
        Self { op, threshold }
    }

    /// Parse `8.5`, `=8.5`, `>8` or `< 7.25`.
    pub fn parse(expression: &str) -> Result<Self, FilterError> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^\s*([<>=])?\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+))\s*$")
                .expect("CGPA expression pattern is valid")
        });

        let invalid = || FilterError::InvalidCgpa {
            expression: expression.to_string(),
        };
        let caps = pattern.captures(expression).ok_or_else(invalid)?;
        let threshold: f64 = caps[2].parse().map_err(|_| invalid())?;
        let op = match caps.get(1).map(|m| m.as_str()) {
            Some(">") => CgpaOp::Gt,
            Some("<") => CgpaOp::Lt,
            _ => CgpaOp::Eq,
        };
        Ok(Self { op, threshold })
    }

    /// Fails closed: a missing or unparseable CGPA never satisfies the
    /// constraint, whatever the operator.
    pub fn matches(&self, record: &Record) -> bool {
        match record_cgpa(record) {
            Some(cgpa) => match self.op {
                CgpaOp::Eq => cgpa == self.threshold,
                CgpaOp::Gt => cgpa > self.threshold,
                CgpaOp::Lt => cgpa < self.threshold,
            },
            None => false,
        }
    }

    /// Title fragment, e.g. `CGPA_8.5` or `CGPA_above_8`.
    pub fn display(&self) -> String {
        let t = CellValue::Number(self.threshold).render();
        match self.op {
            CgpaOp::Eq => format!("CGPA_{t}"),
            CgpaOp::Gt => format!("CGPA_above_{t}"),
            CgpaOp::Lt => format!("CGPA_below_{t}"),
        }
    }
}

/// A record's CGPA as a finite float.
///
/// Text cells are read by their leading numeric prefix, so `"8.2 (provisional)"`
/// yields 8.2 while `"N/A"` yields nothing.
pub fn record_cgpa(record: &Record) -> Option<f64> {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("numeric prefix pattern is valid")
    });

    let raw = resolve(record, CanonicalField::Cgpa);
    let value: f64 = prefix.find(raw.trim_start())?.as_str().parse().ok()?;
    value.is_finite().then_some(value)
}

// =============================================================================
// Multi-criteria filter
// =============================================================================

/// User-composed conjunction of optional constraints.
/// Unset or blank constraints impose no restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Exact (trimmed) string equality.
    pub year: Option<String>,
    /// Case-insensitive equality.
    pub branch: Option<String>,
    /// Case-insensitive equality.
    pub caste: Option<String>,
    /// First-letter prefix match, e.g. "male" matches "M" and "Male".
    pub gender: Option<String>,
    pub cgpa: Option<CgpaConstraint>,
}

impl FilterCriteria {
    fn active(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn year(&self) -> Option<&str> {
        Self::active(&self.year)
    }

    pub fn branch(&self) -> Option<&str> {
        Self::active(&self.branch)
    }

    pub fn caste(&self) -> Option<&str> {
        Self::active(&self.caste)
    }

    pub fn gender(&self) -> Option<&str> {
        Self::active(&self.gender)
    }

    /// Returns true if no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.year().is_none()
            && self.branch().is_none()
            && self.caste().is_none()
            && self.gender().is_none()
            && self.cgpa.is_none()
    }

    /// Check a single record against every active constraint.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(year) = self.year() {
            if normalized(record, CanonicalField::Year) != year {
                return false;
            }
        }

        if let Some(branch) = self.branch() {
            if normalized(record, CanonicalField::Branch) != branch.to_lowercase() {
                return false;
            }
        }

        if let Some(caste) = self.caste() {
            if normalized(record, CanonicalField::Caste) != caste.to_lowercase() {
                return false;
            }
        }

        if let Some(gender) = self.gender() {
            let initial: String = gender.chars().take(1).collect::<String>().to_lowercase();
            if !normalized(record, CanonicalField::Gender).starts_with(&initial) {
                return false;
            }
        }

        if let Some(ref cgpa) = self.cgpa {
            if !cgpa.matches(record) {
                return false;
            }
        }

        true
    }

    /// Export title: active constraints' display forms in fixed order
    /// (year, branch, caste, gender, CGPA), `_`-joined, suffixed `_Students`.
    pub fn export_title(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(year) = self.year() {
            parts.push(format!("{year}Year"));
        }
        if let Some(branch) = self.branch() {
            parts.push(branch.to_string());
        }
        if let Some(caste) = self.caste() {
            parts.push(caste.to_string());
        }
        if let Some(gender) = self.gender() {
            parts.push(capitalize_first(gender));
        }
        if let Some(ref cgpa) = self.cgpa {
            parts.push(cgpa.display());
        }

        if parts.is_empty() {
            DEFAULT_EXPORT_TITLE.to_string()
        } else {
            format!("{}_Students", parts.join("_"))
        }
    }
}

/// Upper-case the first character, leaving the rest untouched.
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apply the multi-criteria filter. With no active constraint the input
/// comes back unchanged, in the same order.
pub fn apply_criteria(records: &[Record], criteria: &FilterCriteria) -> RecordSet {
    if criteria.is_empty() {
        return records.to_vec();
    }

    let result: RecordSet = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();
    tracing::debug!(
        input = records.len(),
        matched = result.len(),
        title = %criteria.export_title(),
        "Criteria filter applied"
    );
    result
}
