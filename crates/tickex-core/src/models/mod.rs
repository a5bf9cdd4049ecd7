//! Data models and configuration.

pub mod config;
pub mod document;

pub use config::{RecognitionConfig, StorageConfig, TickexConfig};
pub use document::{
    BlockGeometry, BlockKind, Confidence, Document, DocumentBase, DocumentType, ExtractedField,
    ExtractionOutput, TextBlock, TextExtractionResult, TransportManifest, WasteItem,
    WeighingTicket, Weight,
};
