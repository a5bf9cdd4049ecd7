//! Data model for OCR results and extracted business documents.
//!
//! Everything here is plain data: created once per extraction, never
//! mutated afterwards, serializable to JSON without surprises.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discriminator for OCR block records.
///
/// Only `Line` blocks participate in `raw_text` assembly and table
/// extraction; anything the backend reports beyond `LINE`/`WORD` maps
/// to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    Line,
    Word,
    #[serde(other)]
    Other,
}

impl BlockKind {
    /// Map a backend wire spelling onto a block kind.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "LINE" => BlockKind::Line,
            "WORD" => BlockKind::Word,
            _ => BlockKind::Other,
        }
    }
}

/// Bounding box of a block in normalized page coordinates (0.0 - 1.0).
///
/// A block carries geometry only when the backend supplied all four
/// numbers; partial boxes are dropped at the mapping layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One OCR-recognized line (or word) of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Opaque identifier from the OCR backend. Empty when absent.
    #[serde(default)]
    pub id: String,

    /// Recognized text, if any.
    pub text: Option<String>,

    /// Block discriminator.
    pub kind: BlockKind,

    /// OCR confidence reported by the backend (not field-level confidence).
    pub confidence: Option<f32>,

    /// Normalized bounding box, when complete.
    pub geometry: Option<BlockGeometry>,
}

impl TextBlock {
    /// True for a `LINE` block with non-empty text.
    pub fn is_text_line(&self) -> bool {
        self.kind == BlockKind::Line
            && self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Output of one OCR invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextExtractionResult {
    /// Newline-joined text of all `LINE` blocks, in backend order, trimmed.
    /// Never empty when the recognition call succeeds.
    pub raw_text: String,

    /// All recognized blocks, in backend order.
    pub blocks: Vec<TextBlock>,
}

/// Field-level confidence assigned by a layout parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// One successfully parsed value plus the literal matched substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField<T> {
    /// The typed parsed value.
    pub parsed: T,

    /// Field-level confidence.
    pub confidence: Confidence,

    /// The raw matched substring, kept for traceability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_match: Option<String>,
}

impl<T> ExtractedField<T> {
    /// Wrap a parsed value at high confidence.
    pub fn high(parsed: T, raw_match: Option<String>) -> Self {
        Self {
            parsed,
            confidence: Confidence::High,
            raw_match,
        }
    }

    /// Wrap a parsed value at low confidence.
    pub fn low(parsed: T, raw_match: Option<String>) -> Self {
        Self {
            parsed,
            confidence: Confidence::Low,
            raw_match,
        }
    }
}

/// Business document types the pipeline can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    WeighingTicket,
    TransportManifest,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::WeighingTicket => write!(f, "weighing_ticket"),
            DocumentType::TransportManifest => write!(f, "transport_manifest"),
        }
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighing_ticket" | "weighing-ticket" => Ok(DocumentType::WeighingTicket),
            "transport_manifest" | "transport-manifest" => Ok(DocumentType::TransportManifest),
            other => Err(format!("unknown document type: {other}")),
        }
    }
}

/// A measured weight with its unit token as printed on the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: Decimal,
    pub unit: String,
}

/// Fields shared by every extracted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBase {
    /// Which document type this is.
    pub document_type: DocumentType,

    /// The full recognized text the parser worked on.
    pub raw_text: String,

    /// Aggregate confidence: high iff nothing is missing or low.
    pub extraction_confidence: Confidence,

    /// Produced fields whose confidence is not high.
    pub low_confidence_fields: Vec<String>,

    /// Required fields the parser could not produce.
    pub missing_required_fields: Vec<String>,
}

/// An extracted weighing ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighingTicket {
    #[serde(flatten)]
    pub base: DocumentBase,

    pub ticket_number: Option<ExtractedField<String>>,
    pub plate: Option<ExtractedField<String>>,
    pub product: Option<ExtractedField<String>>,
    pub supplier: Option<ExtractedField<String>>,
    pub gross_weight: Option<ExtractedField<Weight>>,
    pub gross_weight_at: Option<ExtractedField<NaiveDateTime>>,
    pub tare_weight: Option<ExtractedField<Weight>>,
    pub tare_weight_at: Option<ExtractedField<NaiveDateTime>>,
    pub net_weight: Option<ExtractedField<Weight>>,
}

/// One waste line-item from a manifest table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteItem {
    pub item: String,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

/// An extracted transport/recycling manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportManifest {
    #[serde(flatten)]
    pub base: DocumentBase,

    pub manifest_number: Option<ExtractedField<String>>,
    pub issue_date: Option<ExtractedField<NaiveDate>>,
    pub transporter: Option<ExtractedField<String>>,
    pub items: Vec<WasteItem>,
}

/// Closed enum over the concrete document shapes.
///
/// Untagged: `document_type` inside the flattened base disambiguates on
/// the wire. The manifest variant must stay first so its required
/// `items` field keeps untagged deserialization unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    TransportManifest(TransportManifest),
    WeighingTicket(WeighingTicket),
}

impl Document {
    /// The shared base of whichever variant this is.
    pub fn base(&self) -> &DocumentBase {
        match self {
            Document::TransportManifest(m) => &m.base,
            Document::WeighingTicket(t) => &t.base,
        }
    }
}

/// Final result of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput<T> {
    /// The extracted document.
    pub data: T,

    /// Whether a human must review the result.
    pub review_required: bool,

    /// Human-readable reasons for review.
    pub review_reasons: Vec<String>,

    /// Identifier of the layout parser that produced the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<String>,
}
