//! Geometric table extraction from positioned OCR blocks.
//!
//! Blocks are clustered into visual rows by vertical proximity, assigned
//! to columns by configured horizontal anchors, and merged into logical
//! rows keyed on the anchor column.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::document::TextBlock;

/// Default vertical tolerance for row clustering, in normalized page units.
pub const DEFAULT_Y_TOLERANCE: f32 = 0.008;

/// Default horizontal slack applied to column boundaries.
pub const DEFAULT_X_TOLERANCE: f32 = 0.01;

/// A column's logical name and the left edge of its header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub header_left: f32,
}

/// Vertical band of the page to consider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YRange {
    pub min: f32,
    pub max: f32,
}

/// Configuration for one table extraction.
///
/// `columns` must be non-empty and `anchor_column` must name one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Column whose presence marks the start of a new logical row.
    pub anchor_column: String,

    /// Columns with their header left edges.
    pub columns: Vec<TableColumn>,

    /// Optional vertical band filter.
    pub y_range: Option<YRange>,

    /// Row-clustering tolerance. Defaults to [`DEFAULT_Y_TOLERANCE`].
    pub y_tolerance: Option<f32>,

    /// Column-boundary slack. Defaults to [`DEFAULT_X_TOLERANCE`].
    pub x_tolerance: Option<f32>,

    /// Maximum vertical gap between a continuation and the last anchor
    /// row before the continuation is treated as unrelated trailing text.
    pub max_row_gap: Option<f32>,
}

/// One logical row: column name to cell text.
pub type TableRow = BTreeMap<String, String>;

/// Extracted table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Half-open horizontal range owned by one column.
struct ColumnRange {
    name: String,
    min: f32,
    max: f32,
}

/// A visual row cluster reduced to per-column cell text.
struct PartialRow {
    top: f32,
    cells: TableRow,
}

/// Extract logical rows from positioned `LINE` blocks.
pub fn extract_table(blocks: &[TextBlock], config: &TableConfig) -> Table {
    let y_tolerance = config.y_tolerance.unwrap_or(DEFAULT_Y_TOLERANCE);
    let ranges = column_ranges(config);

    // Only positioned, non-empty LINE blocks participate, optionally
    // restricted to the configured vertical band.
    let mut candidates: Vec<&TextBlock> = blocks
        .iter()
        .filter(|block| block.is_text_line() && block.geometry.is_some())
        .filter(|block| match (&config.y_range, &block.geometry) {
            (Some(range), Some(geometry)) => {
                geometry.top >= range.min && geometry.top <= range.max
            }
            _ => true,
        })
        .collect();

    candidates.sort_by(|a, b| {
        let a_top = a.geometry.map(|g| g.top).unwrap_or_default();
        let b_top = b.geometry.map(|g| g.top).unwrap_or_default();
        a_top.partial_cmp(&b_top).unwrap_or(std::cmp::Ordering::Equal)
    });

    let partials = cluster_rows(&candidates, y_tolerance)
        .into_iter()
        .map(|cluster| assign_columns(&cluster, &ranges))
        .collect::<Vec<_>>();

    let rows = merge_rows(partials, config);
    debug!(
        "extracted {} logical rows from {} candidate blocks",
        rows.len(),
        candidates.len()
    );

    Table { rows }
}

/// Chain clustering: a block joins the current cluster when its top is
/// within tolerance of the previous block's top, not the cluster's
/// first. Layout tolerances were tuned against this chaining, so a run
/// of blocks each near its neighbor merges even when the run spans more
/// than one tolerance end to end.
fn cluster_rows<'a>(sorted: &[&'a TextBlock], y_tolerance: f32) -> Vec<Vec<&'a TextBlock>> {
    let mut clusters: Vec<Vec<&TextBlock>> = Vec::new();
    let mut current: Vec<&TextBlock> = Vec::new();
    let mut last_top: Option<f32> = None;

    for block in sorted {
        let Some(geometry) = block.geometry else { continue };

        match last_top {
            Some(previous) if (geometry.top - previous).abs() <= y_tolerance => {
                current.push(block);
            }
            Some(_) => {
                clusters.push(std::mem::take(&mut current));
                current.push(block);
            }
            None => current.push(block),
        }
        last_top = Some(geometry.top);
    }

    if !current.is_empty() {
        clusters.push(current);
    }
    clusters
}

/// Build per-column half-open ranges from the configured header lefts.
fn column_ranges(config: &TableConfig) -> Vec<ColumnRange> {
    let x_tolerance = config.x_tolerance.unwrap_or(DEFAULT_X_TOLERANCE);

    let mut columns = config.columns.clone();
    columns.sort_by(|a, b| {
        a.header_left
            .partial_cmp(&b.header_left)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let max = match columns.get(index + 1) {
                Some(next) => next.header_left - x_tolerance,
                None => 1.0,
            };
            ColumnRange {
                name: column.name.clone(),
                min: column.header_left - x_tolerance,
                max,
            }
        })
        .collect()
}

/// Assign each block of a cluster to the first column range containing
/// its left edge. Blocks outside every range are silently dropped.
/// Multiple blocks landing in one column concatenate with a single space
/// in visit order, which is geometry sort order rather than left-to-right
/// order. Downstream layouts depend on that exact behavior.
fn assign_columns(cluster: &[&TextBlock], ranges: &[ColumnRange]) -> PartialRow {
    let top = cluster
        .first()
        .and_then(|block| block.geometry)
        .map(|g| g.top)
        .unwrap_or_default();

    let mut cells = TableRow::new();
    for block in cluster {
        let (Some(geometry), Some(text)) = (block.geometry, block.text.as_deref()) else {
            continue;
        };

        let Some(range) = ranges
            .iter()
            .find(|r| geometry.left >= r.min && geometry.left < r.max)
        else {
            continue;
        };

        match cells.entry(range.name.clone()) {
            Entry::Occupied(mut entry) => {
                let cell = entry.get_mut();
                cell.push(' ');
                cell.push_str(text);
            }
            Entry::Vacant(entry) => {
                entry.insert(text.to_string());
            }
        }
    }

    PartialRow { top, cells }
}

/// Merge partial rows into logical rows keyed on the anchor column.
///
/// A partial row with a non-empty anchor value starts a new logical row;
/// one without is a continuation of the previous logical row. Anchorless
/// rows before the first anchor are dropped, as are continuations whose
/// top exceeds the last anchor row's top by more than `max_row_gap`.
fn merge_rows(partials: Vec<PartialRow>, config: &TableConfig) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = Vec::new();
    let mut last_anchor_top: Option<f32> = None;

    for partial in partials {
        let has_anchor = partial
            .cells
            .get(&config.anchor_column)
            .is_some_and(|value| !value.trim().is_empty());

        if has_anchor {
            last_anchor_top = Some(partial.top);
            rows.push(partial.cells);
            continue;
        }

        let Some(current) = rows.last_mut() else {
            continue;
        };
        if let (Some(max_gap), Some(anchor_top)) = (config.max_row_gap, last_anchor_top) {
            if partial.top - anchor_top > max_gap {
                continue;
            }
        }

        for (name, value) in partial.cells {
            match current.entry(name) {
                Entry::Occupied(mut entry) => {
                    let cell = entry.get_mut();
                    cell.push(' ');
                    cell.push_str(&value);
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }

    rows
}
