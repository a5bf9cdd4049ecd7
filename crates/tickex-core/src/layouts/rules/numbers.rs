//! Locale-aware numeric parsing (decimal comma, thousands dot).

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use crate::models::document::{ExtractedField, Weight};

/// Parse a pt-BR formatted number (e.g. "1.234,56" or "200,25").
///
/// Dots and spaces are thousands separators, the comma is the decimal
/// mark. Returns `None` on anything unparsable; callers treat that as
/// "field absent", never as an error.
pub fn parse_locale_number(s: &str) -> Option<Decimal> {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = compact.replace('.', "").replace(',', ".");
    if !normalized
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || c == '.' || (c == '-' && i == 0))
    {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

/// Extract a labeled weight: capture group 1 is the locale number,
/// group 2 the unit token. Returns the field and the byte offset just
/// past the match, for anchoring a follow-up timestamp search.
pub fn labeled_weight(regex: &Regex, text: &str) -> Option<(ExtractedField<Weight>, usize)> {
    let caps = regex.captures(text)?;
    let value = parse_locale_number(caps.get(1)?.as_str())?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    let matched = caps.get(0)?;

    Some((
        ExtractedField::high(
            Weight { value, unit },
            Some(matched.as_str().to_string()),
        ),
        matched.end(),
    ))
}
