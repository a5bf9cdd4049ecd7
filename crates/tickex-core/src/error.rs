//! Error types for the tickex-core library.

use thiserror::Error;

/// Main error type for the tickex library.
#[derive(Error, Debug)]
pub enum TickexError {
    /// Text recognition error.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Layout extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Object storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the text recognition service.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The extraction request was malformed (neither or both input forms).
    #[error("invalid extraction input: {0}")]
    InvalidInput(String),

    /// The OCR backend returned zero blocks.
    #[error("OCR returned no blocks")]
    NoBlocks,

    /// The OCR backend returned blocks but none of them were usable lines.
    #[error("OCR returned no line blocks")]
    NoLineBlocks,

    /// The document could not be split into single-page sub-documents.
    #[error("failed to split document into pages: {0}")]
    PageSplit(String),

    /// Error from the OCR backend other than the fallback signal.
    #[error("OCR backend error: {0}")]
    Backend(#[from] OcrBackendError),

    /// Error fetching the remote object for the fallback path.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error reading a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by an OCR backend implementation.
///
/// `UnsupportedDocument` is the named discriminator that triggers the
/// page-split fallback; it is never surfaced to the caller when the
/// fallback itself succeeds. Everything else propagates unchanged.
#[derive(Error, Debug)]
pub enum OcrBackendError {
    /// The document format/complexity is unsupported for synchronous processing.
    #[error("document unsupported for synchronous processing")]
    UnsupportedDocument,

    /// The backend reported a service-side failure.
    #[error("OCR service error: {0}")]
    Service(String),

    /// The backend could not be reached.
    #[error("OCR transport error: {0}")]
    Transport(String),
}

/// Errors raised by object-store implementations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The requested object does not exist.
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    /// The object exists but its body is empty.
    #[error("object {bucket}/{key} has an empty body")]
    EmptyBody { bucket: String, key: String },

    /// I/O error accessing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised during layout selection and parsing.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No registered layout parser was applicable to the document.
    #[error("no layout parser matched the document")]
    NoParserMatched,
}

/// Result type for the tickex library.
pub type Result<T> = std::result::Result<T, TickexError>;
