//! Labeled text-value helpers shared by the layouts.

use regex::Regex;

use crate::models::document::ExtractedField;

/// Extract a labeled value, keeping only the first line when the value
/// spans a line break.
pub fn labeled_line(regex: &Regex, text: &str) -> Option<ExtractedField<String>> {
    let caps = regex.captures(text)?;
    let value = caps.get(1)?.as_str().lines().next()?.trim().to_string();
    if value.is_empty() {
        return None;
    }

    Some(ExtractedField::high(
        value,
        caps.get(0).map(|m| m.as_str().to_string()),
    ))
}
