//! Text recognition service.
//!
//! Submits a document to the OCR backend in synchronous detect-text mode
//! and, when the backend rejects it as unsupported, falls back to
//! splitting the document into single pages and recognizing them
//! concurrently.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::future;
use tracing::{debug, info};

use crate::error::{OcrBackendError, RecognitionError};
use crate::models::document::{TextBlock, TextExtractionResult};

use super::backend::{OcrBackend, OcrInput};
use super::pages::split_pages;
use super::store::ObjectStore;

/// The document to recognize: exactly one of a local file or a
/// bucket/key remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Remote { bucket: String, key: String },
}

impl DocumentSource {
    /// Build a source from optional request parts, rejecting anything
    /// other than exactly one complete form.
    pub fn from_parts(
        file: Option<PathBuf>,
        bucket: Option<String>,
        key: Option<String>,
    ) -> Result<Self, RecognitionError> {
        match (file, bucket, key) {
            (Some(path), None, None) => Ok(DocumentSource::File(path)),
            (None, Some(bucket), Some(key)) => Ok(DocumentSource::Remote { bucket, key }),
            (None, None, None) => Err(RecognitionError::InvalidInput(
                "either a file path or a bucket/key pair is required".to_string(),
            )),
            (None, _, _) => Err(RecognitionError::InvalidInput(
                "a remote source needs both bucket and key".to_string(),
            )),
            (Some(_), _, _) => Err(RecognitionError::InvalidInput(
                "file path and bucket/key are mutually exclusive".to_string(),
            )),
        }
    }
}

/// OCR invocation layer with the page-split fallback.
pub struct TextRecognizer {
    backend: Arc<dyn OcrBackend>,
    store: Arc<dyn ObjectStore>,
}

impl TextRecognizer {
    /// Create a recognizer over the given backend and object store.
    pub fn new(backend: Arc<dyn OcrBackend>, store: Arc<dyn ObjectStore>) -> Self {
        Self { backend, store }
    }

    /// Recognize all text in the document.
    ///
    /// Fails with [`RecognitionError::NoBlocks`] when the backend returns
    /// nothing and [`RecognitionError::NoLineBlocks`] when no usable
    /// `LINE` text remains after joining.
    pub async fn extract_text(
        &self,
        source: &DocumentSource,
    ) -> Result<TextExtractionResult, RecognitionError> {
        let started = Instant::now();

        let result = match source {
            DocumentSource::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                match self.backend.detect_text(OcrInput::Bytes(&bytes)).await {
                    Ok(blocks) => assemble(blocks)?,
                    Err(OcrBackendError::UnsupportedDocument) => {
                        self.recognize_per_page(&bytes).await?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            DocumentSource::Remote { bucket, key } => {
                match self
                    .backend
                    .detect_text(OcrInput::Remote { bucket, key })
                    .await
                {
                    Ok(blocks) => assemble(blocks)?,
                    Err(OcrBackendError::UnsupportedDocument) => {
                        let bytes = self.store.get(bucket, key).await?;
                        self.recognize_per_page(&bytes).await?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        debug!(
            "recognized {} blocks in {:?}",
            result.blocks.len(),
            started.elapsed()
        );
        Ok(result)
    }

    /// Fallback path: split into single pages and recognize concurrently.
    ///
    /// Results are re-assembled in original page order regardless of
    /// completion order; any page failure fails the whole extraction.
    async fn recognize_per_page(
        &self,
        bytes: &[u8],
    ) -> Result<TextExtractionResult, RecognitionError> {
        let pages = split_pages(bytes)?;
        info!(
            "document unsupported synchronously, recognizing {} pages individually",
            pages.len()
        );

        let calls = pages
            .iter()
            .map(|page| self.backend.detect_text(OcrInput::Bytes(page)));
        let per_page = future::try_join_all(calls).await?;

        let mut blocks: Vec<TextBlock> = Vec::new();
        for page_blocks in per_page {
            if page_blocks.is_empty() {
                return Err(RecognitionError::NoBlocks);
            }
            blocks.extend(page_blocks);
        }

        assemble(blocks)
    }
}

/// Build the extraction result from mapped blocks, enforcing the
/// no-blocks and no-line-blocks invariants.
fn assemble(blocks: Vec<TextBlock>) -> Result<TextExtractionResult, RecognitionError> {
    if blocks.is_empty() {
        return Err(RecognitionError::NoBlocks);
    }

    let raw_text = blocks
        .iter()
        .filter(|block| block.is_text_line())
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    if raw_text.is_empty() {
        return Err(RecognitionError::NoLineBlocks);
    }

    Ok(TextExtractionResult { raw_text, blocks })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use crate::models::document::BlockKind;
    use crate::recognition::pages::test_support::{contains_bytes, pdf_with_pages};
    use crate::recognition::store::FsObjectStore;

    use super::*;

    fn line(text: &str) -> TextBlock {
        TextBlock {
            id: String::new(),
            text: Some(text.to_string()),
            kind: BlockKind::Line,
            confidence: Some(0.99),
            geometry: None,
        }
    }

    fn word(text: &str) -> TextBlock {
        TextBlock {
            id: String::new(),
            text: Some(text.to_string()),
            kind: BlockKind::Word,
            confidence: None,
            geometry: None,
        }
    }

    /// Backend that always returns the same canned blocks.
    struct FixedBackend {
        blocks: Vec<TextBlock>,
    }

    #[async_trait]
    impl OcrBackend for FixedBackend {
        async fn detect_text(
            &self,
            _input: OcrInput<'_>,
        ) -> Result<Vec<TextBlock>, OcrBackendError> {
            Ok(self.blocks.clone())
        }
    }

    /// Backend that rejects whole documents as unsupported and answers
    /// per-page calls by sniffing the page marker out of the PDF bytes.
    /// Earlier pages sleep longer, so completion order is reversed and
    /// the page-order guarantee is actually exercised.
    struct PageSniffingBackend {
        page_count: usize,
    }

    #[async_trait]
    impl OcrBackend for PageSniffingBackend {
        async fn detect_text(
            &self,
            input: OcrInput<'_>,
        ) -> Result<Vec<TextBlock>, OcrBackendError> {
            let bytes = match input {
                OcrInput::Bytes(bytes) => bytes,
                OcrInput::Remote { .. } => return Err(OcrBackendError::UnsupportedDocument),
            };

            let markers: Vec<usize> = (1..=self.page_count)
                .filter(|k| contains_bytes(bytes, format!("(Page {k} line)").as_bytes()))
                .collect();

            match markers.as_slice() {
                [] => Ok(vec![]),
                [page] => {
                    let delay = 20 * (self.page_count - page) as u64;
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok(vec![line(&format!("Page {page} line"))])
                }
                // More than one marker means the whole document.
                _ => Err(OcrBackendError::UnsupportedDocument),
            }
        }
    }

    /// Backend where one page always fails.
    struct FailingPageBackend;

    #[async_trait]
    impl OcrBackend for FailingPageBackend {
        async fn detect_text(
            &self,
            input: OcrInput<'_>,
        ) -> Result<Vec<TextBlock>, OcrBackendError> {
            let bytes = match input {
                OcrInput::Bytes(bytes) => bytes,
                OcrInput::Remote { .. } => return Err(OcrBackendError::UnsupportedDocument),
            };
            if contains_bytes(bytes, b"(Page 2 line)") && !contains_bytes(bytes, b"(Page 1 line)")
            {
                return Err(OcrBackendError::Service("page 2 exploded".to_string()));
            }
            if contains_bytes(bytes, b"(Page 1 line)") && contains_bytes(bytes, b"(Page 2 line)") {
                return Err(OcrBackendError::UnsupportedDocument);
            }
            Ok(vec![line("Page 1 line")])
        }
    }

    fn recognizer(backend: impl OcrBackend + 'static) -> (TextRecognizer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsObjectStore::new(dir.path().to_path_buf()));
        (TextRecognizer::new(Arc::new(backend), store), dir)
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_from_parts_accepts_exactly_one_form() {
        assert!(DocumentSource::from_parts(Some(PathBuf::from("a.pdf")), None, None).is_ok());
        assert!(
            DocumentSource::from_parts(None, Some("b".to_string()), Some("k".to_string())).is_ok()
        );

        for (file, bucket, key) in [
            (None, None, None),
            (None, Some("b".to_string()), None),
            (None, None, Some("k".to_string())),
            (Some(PathBuf::from("a.pdf")), Some("b".to_string()), Some("k".to_string())),
        ] {
            let err = DocumentSource::from_parts(file, bucket, key).unwrap_err();
            assert!(matches!(err, RecognitionError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_extract_text_joins_line_blocks() {
        let (recognizer, dir) = recognizer(FixedBackend {
            blocks: vec![line("Ticket: 42"), word("ignored"), line("Placa: ABC1D23")],
        });
        let path = write_file(&dir, "doc.pdf", b"irrelevant");

        let result = recognizer
            .extract_text(&DocumentSource::File(path))
            .await
            .unwrap();

        assert_eq!(result.raw_text, "Ticket: 42\nPlaca: ABC1D23");
        assert_eq!(result.blocks.len(), 3);
    }

    #[tokio::test]
    async fn test_extract_text_is_idempotent() {
        let (recognizer, dir) = recognizer(FixedBackend {
            blocks: vec![line("Ticket: 42"), line("Peso Líquido: 200,25 kg")],
        });
        let path = write_file(&dir, "doc.pdf", b"irrelevant");
        let source = DocumentSource::File(path);

        let first = recognizer.extract_text(&source).await.unwrap();
        let second = recognizer.extract_text(&source).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_blocks_fails_with_no_blocks() {
        let (recognizer, dir) = recognizer(FixedBackend { blocks: vec![] });
        let path = write_file(&dir, "doc.pdf", b"irrelevant");

        let err = recognizer
            .extract_text(&DocumentSource::File(path))
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::NoBlocks));
    }

    #[tokio::test]
    async fn test_word_only_document_fails_with_no_line_blocks() {
        let (recognizer, dir) = recognizer(FixedBackend {
            blocks: vec![word("only"), word("words")],
        });
        let path = write_file(&dir, "doc.pdf", b"irrelevant");

        let err = recognizer
            .extract_text(&DocumentSource::File(path))
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::NoLineBlocks));
    }

    #[tokio::test]
    async fn test_fallback_concatenates_pages_in_page_order() {
        let pdf = pdf_with_pages(&["Page 1 line", "Page 2 line", "Page 3 line"]);
        let (recognizer, dir) = recognizer(PageSniffingBackend { page_count: 3 });
        let path = write_file(&dir, "doc.pdf", &pdf);

        let result = recognizer
            .extract_text(&DocumentSource::File(path))
            .await
            .unwrap();

        assert_eq!(result.raw_text, "Page 1 line\nPage 2 line\nPage 3 line");
        assert_eq!(result.blocks.len(), 3);
    }

    #[tokio::test]
    async fn test_fallback_works_for_remote_objects() {
        let pdf = pdf_with_pages(&["Page 1 line", "Page 2 line", "Page 3 line"]);
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tickets")).unwrap();
        std::fs::write(dir.path().join("tickets/doc.pdf"), &pdf).unwrap();

        let store = Arc::new(FsObjectStore::new(dir.path().to_path_buf()));
        let recognizer =
            TextRecognizer::new(Arc::new(PageSniffingBackend { page_count: 3 }), store);

        let result = recognizer
            .extract_text(&DocumentSource::Remote {
                bucket: "tickets".to_string(),
                key: "doc.pdf".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.raw_text, "Page 1 line\nPage 2 line\nPage 3 line");
    }

    #[tokio::test]
    async fn test_single_page_failure_fails_the_extraction() {
        let pdf = pdf_with_pages(&["Page 1 line", "Page 2 line"]);
        let (recognizer, dir) = recognizer(FailingPageBackend);
        let path = write_file(&dir, "doc.pdf", &pdf);

        let err = recognizer
            .extract_text(&DocumentSource::File(path))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecognitionError::Backend(OcrBackendError::Service(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_errors_propagate_unchanged() {
        struct BrokenBackend;

        #[async_trait]
        impl OcrBackend for BrokenBackend {
            async fn detect_text(
                &self,
                _input: OcrInput<'_>,
            ) -> Result<Vec<TextBlock>, OcrBackendError> {
                Err(OcrBackendError::Transport("connection refused".to_string()))
            }
        }

        let (recognizer, dir) = recognizer(BrokenBackend);
        let path = write_file(&dir, "doc.pdf", b"irrelevant");

        let err = recognizer
            .extract_text(&DocumentSource::File(path))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RecognitionError::Backend(OcrBackendError::Transport(_))
        ));
    }
}
