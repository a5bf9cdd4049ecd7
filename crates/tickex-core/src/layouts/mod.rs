//! Layout-specific parsers, their registry, and the extraction
//! finalizer.

pub mod finalize;
pub mod manifest;
pub mod registry;
pub mod rules;
pub mod weighing;

pub use finalize::{FieldLedger, Finalized, finalize};
pub use manifest::ManifestLayout1;
pub use registry::{LayoutRegistry, LayoutRegistryBuilder, default_layout_ids};
pub use weighing::{WeighingLayout1, WeighingLayout2};

use crate::error::ExtractionError;
use crate::models::document::{Document, DocumentType, ExtractionOutput, TextExtractionResult};

/// One layout-specific parser.
///
/// A parser self-scores how well an OCR result matches its layout and,
/// when selected, turns the result into a structured document.
pub trait LayoutParser: Send + Sync {
    /// Document type this parser produces.
    fn document_type(&self) -> DocumentType;

    /// Stable identifier of the visual template, e.g. `"layout-1"`.
    fn layout_id(&self) -> &'static str;

    /// Normalized count in [0, 1] of this layout's signature patterns
    /// found in the raw text.
    fn match_score(&self, result: &TextExtractionResult) -> f32;

    /// Parse the OCR result into a structured document. Field-level
    /// parse failures degrade to absent fields; they are never errors.
    fn parse(
        &self,
        result: &TextExtractionResult,
    ) -> Result<ExtractionOutput<Document>, ExtractionError>;
}

/// Score as the fraction of signature patterns matching the raw text.
pub(crate) fn signature_score(raw_text: &str, signatures: &[&regex::Regex]) -> f32 {
    if signatures.is_empty() {
        return 0.0;
    }
    let hits = signatures
        .iter()
        .filter(|regex| regex.is_match(raw_text))
        .count();
    hits as f32 / signatures.len() as f32
}
