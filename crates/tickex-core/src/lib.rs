//! Core library for scanned weighing-ticket and transport-manifest
//! extraction.
//!
//! This crate provides:
//! - OCR text recognition over an HTTP backend, with a per-page
//!   fallback for documents the backend rejects whole
//! - Geometry helpers that reconstruct table rows and columns from
//!   positioned text blocks
//! - Layout-specific parsers for weighing tickets and transport
//!   manifests, selected by signature-pattern scoring

pub mod error;
pub mod geometry;
pub mod layouts;
pub mod models;
pub mod pipeline;
pub mod recognition;

pub use error::{
    ExtractionError, OcrBackendError, RecognitionError, Result, StorageError, TickexError,
};
pub use models::config::TickexConfig;
pub use models::document::{
    Confidence, Document, DocumentType, ExtractedField, ExtractionOutput, TextBlock,
    TextExtractionResult, TransportManifest, WasteItem, Weight, WeighingTicket,
};
pub use layouts::{LayoutParser, LayoutRegistry, default_layout_ids};
pub use pipeline::{DocumentExtractor, ExtractOptions};
pub use recognition::{
    DocumentSource, FsObjectStore, HttpOcrBackend, ObjectStore, OcrBackend, TextRecognizer,
};
