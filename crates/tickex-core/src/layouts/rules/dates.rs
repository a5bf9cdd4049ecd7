//! Date and timestamp parsing for the shipped layouts.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::document::ExtractedField;

use super::patterns::DATE_TIME_LABEL;

/// Parse a `dd/mm/yyyy hh:mm[:ss]` timestamp.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(s, format) {
            return Some(value);
        }
    }
    None
}

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

/// Find the first `Data / Hora` timestamp at or after `from`.
///
/// This is the nearest-match-after-anchor association: each weight field
/// searches independently from its own match position, and when the
/// document repeats the identical label the first occurrence after the
/// anchor wins even if it textually belongs to another field. Known
/// limitation, kept as-is.
pub fn find_datetime_after(text: &str, from: usize) -> Option<ExtractedField<NaiveDateTime>> {
    let caps = DATE_TIME_LABEL.captures(text.get(from..)?)?;
    let value = parse_datetime(caps.get(1)?.as_str())?;
    Some(ExtractedField::high(
        value,
        caps.get(0).map(|m| m.as_str().to_string()),
    ))
}
