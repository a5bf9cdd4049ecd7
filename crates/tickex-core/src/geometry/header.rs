//! Dynamic header row detection.
//!
//! Locates a header row by matching configured label patterns against
//! `LINE` blocks and derives column boundaries from the header's own
//! positions, for layouts whose column geometry is not hard-coded.

use regex::Regex;
use tracing::debug;

use crate::models::document::TextBlock;

use super::table::{DEFAULT_Y_TOLERANCE, TableColumn};

/// How a header label is matched.
#[derive(Debug, Clone)]
pub enum HeaderPattern {
    /// Case-insensitive full match of the trimmed block text.
    Exact(String),
    /// Regex test against the block text.
    Pattern(Regex),
}

impl HeaderPattern {
    fn matches(&self, text: &str) -> bool {
        match self {
            HeaderPattern::Exact(label) => text.trim().to_lowercase() == label.to_lowercase(),
            HeaderPattern::Pattern(regex) => regex.is_match(text),
        }
    }
}

/// One expected header column.
#[derive(Debug, Clone)]
pub struct HeaderColumn {
    pub name: String,
    pub pattern: HeaderPattern,
}

impl HeaderColumn {
    pub fn exact(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: HeaderPattern::Exact(label.to_string()),
        }
    }

    pub fn pattern(name: &str, regex: Regex) -> Self {
        Self {
            name: name.to_string(),
            pattern: HeaderPattern::Pattern(regex),
        }
    }
}

/// Options for header detection.
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Maximum spread of header tops. Defaults to [`DEFAULT_Y_TOLERANCE`].
    pub y_tolerance: Option<f32>,
}

/// A successfully detected header row.
#[derive(Debug, Clone)]
pub struct DetectedHeader {
    /// Columns sorted by ascending left edge, ready for table extraction.
    pub columns: Vec<TableColumn>,
    /// Top of the header row.
    pub header_top: f32,
}

/// Detect a header row among positioned `LINE` blocks.
///
/// Every definition must match a block, and all matched blocks must sit
/// within `y_tolerance` of the first definition's match; otherwise the
/// header is ambiguous and detection returns `None`. No partial
/// detection.
pub fn detect_columns(
    blocks: &[TextBlock],
    definitions: &[HeaderColumn],
    options: &DetectOptions,
) -> Option<DetectedHeader> {
    let y_tolerance = options.y_tolerance.unwrap_or(DEFAULT_Y_TOLERANCE);

    let mut matched: Vec<(&HeaderColumn, f32, f32)> = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let block = blocks.iter().find(|block| {
            block.is_text_line()
                && block.geometry.is_some()
                && block
                    .text
                    .as_deref()
                    .is_some_and(|text| definition.pattern.matches(text))
        })?;
        let geometry = block.geometry?;
        matched.push((definition, geometry.left, geometry.top));
    }

    let header_top = matched.first().map(|(_, _, top)| *top)?;
    if matched
        .iter()
        .any(|(_, _, top)| (top - header_top).abs() > y_tolerance)
    {
        debug!("header labels found on different rows, detection ambiguous");
        return None;
    }

    let mut columns: Vec<TableColumn> = matched
        .into_iter()
        .map(|(definition, left, _)| TableColumn {
            name: definition.name.clone(),
            header_left: left,
        })
        .collect();
    columns.sort_by(|a, b| {
        a.header_left
            .partial_cmp(&b.header_left)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Some(DetectedHeader { columns, header_top })
}
