//! Geometry-based clustering: visual rows, columns, and header detection.

mod header;
mod table;

pub use header::{DetectOptions, DetectedHeader, HeaderColumn, HeaderPattern, detect_columns};
pub use table::{
    DEFAULT_X_TOLERANCE, DEFAULT_Y_TOLERANCE, Table, TableColumn, TableConfig, TableRow, YRange,
    extract_table,
};
