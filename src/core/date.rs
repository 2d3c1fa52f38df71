// Rollbook - core/date.rs
//
// Join-date normalisation. The "Month-Year" column arrives either as a
// spreadsheet day serial (number, or numeric text) or as a calendar
// string in one of several human formats. Everything is reduced to a
// `NaiveDate`; day granularity is enough for ordering and no timezone is
// involved.

use crate::core::fields::{resolve_raw, CanonicalField};
use crate::core::model::{CellValue, Record};
use crate::util::constants::SERIAL_EPOCH;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

/// Numeric full-date formats tried in order after the RFC 3339 check.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time formats; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Month-only formats. These are anchored to the first of the month by
/// prefixing a day component before parsing. `%B` accepts both full and
/// abbreviated month names.
const MONTH_FORMATS: &[&str] = &[
    "%Y-%m", "%Y/%m", "%m/%Y", "%m-%Y", "%B %Y", "%B, %Y", "%B-%Y", "%B-%y", "%B %y",
];

/// Full dates with a month name. Tried after the month-only formats:
/// `%B %d %Y` would otherwise read "May 2024" as May 20 of year 24.
const NAMED_DATE_FORMATS: &[&str] = &["%d %B %Y", "%B %d, %Y", "%B %d %Y", "%d-%B-%Y", "%d-%B-%y"];

/// `%Y` accepts short years, so "Sep 2022" can satisfy a day-month-year
/// pattern as year 22. Calendar strings with such years are rejected.
const MIN_TEXT_YEAR: i32 = 1000;

/// Convert a join-date cell into a comparable date.
///
/// Returns `None` for empty input and for anything that is neither a
/// finite number nor a recognised calendar string.
pub fn parse_month_year(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(serial) => from_serial(*serial),
        CellValue::Text(raw) => parse_text(raw),
    }
}

/// Resolve and normalise the join date of `record`.
pub fn join_date(record: &Record) -> Option<NaiveDate> {
    resolve_raw(record, CanonicalField::JoinDate).and_then(parse_month_year)
}

/// Interpret `serial` as a day offset from the spreadsheet epoch.
/// Fractional days (time of day) are dropped.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    let days = serial.floor();
    // Beyond chrono's representable range either way.
    if days.abs() > 1.0e8 {
        return None;
    }
    let days = days as i64;
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn parse_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Numeric text is still a serial ("45123" from a CSV round-trip).
    if let Ok(n) = s.parse::<f64>() {
        return from_serial(n);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return plausible(dt.date_naive());
    }

    let full_date = |fmt: &&str| NaiveDate::parse_from_str(s, fmt).ok().and_then(plausible);

    if let Some(date) = DATE_FORMATS.iter().find_map(full_date) {
        return Some(date);
    }

    if let Some(date) = DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .and_then(|dt| plausible(dt.date()))
    }) {
        return Some(date);
    }

    let anchored = format!("01 {s}");
    if let Some(date) = MONTH_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&anchored, &format!("%d {fmt}"))
            .ok()
            .and_then(plausible)
    }) {
        return Some(date);
    }

    if let Some(date) = NAMED_DATE_FORMATS.iter().find_map(full_date) {
        return Some(date);
    }

    tracing::trace!(value = s, "Unparseable join date");
    None
}

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= MIN_TEXT_YEAR).then_some(date)
}
