// Rollbook - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use std::fmt;

// =============================================================================
// Cell values
// =============================================================================

/// A single cell as decoded by the ingestion collaborator.
///
/// Spreadsheet exports mix numbers and strings freely within a column, so
/// the distinction is kept: join dates stored as day serials must be read
/// as numbers, not as their rendered text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Empty,
}

impl CellValue {
    /// Build a text cell; blank input becomes `Empty`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Display form used for comparisons and CSV output.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => render_number(*n),
            Self::Empty => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Integral values print without a fractional part so a `Year` column
/// decoded as `1.0` still compares equal to `"1"`.
fn render_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// =============================================================================
// Record
// =============================================================================

/// One student entry: an ordered, schema-less key/value mapping.
///
/// Key order is the order of first insertion and is what the CSV export
/// uses as its header. Records are small (tens of columns), so lookups are
/// linear scans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Ordered sequence of records in ingestion order.
///
/// Derive operations take `&[Record]` and return a fresh `RecordSet`; the
/// source set is never mutated in place.
pub type RecordSet = Vec<Record>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(1.0).render(), "1");
        assert_eq!(CellValue::Number(45123.0).render(), "45123");
        assert_eq!(CellValue::Number(8.75).render(), "8.75");
        assert_eq!(CellValue::Number(-3.0).render(), "-3");
        assert_eq!(CellValue::Number(f64::NAN).render(), "NaN");
    }

    #[test]
    fn test_blank_text_becomes_empty() {
        assert_eq!(CellValue::text(""), CellValue::Empty);
        assert_eq!(CellValue::from(" "), CellValue::Text(" ".to_string()));
    }

    #[test]
    fn test_insert_preserves_first_position() {
        let mut record = Record::new().with("A", "1").with("B", "2");
        record.insert("A", "3");
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(record.get("A"), Some(&CellValue::Text("3".to_string())));
    }

    #[test]
    fn test_from_iterator() {
        let record: Record = [("Name", "Asha"), ("Year", "2")].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert!(record.contains_key("Year"));
        assert!(record.get("year").is_none());
    }
}
