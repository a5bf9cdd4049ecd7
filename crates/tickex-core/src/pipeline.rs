//! Document extraction pipeline: OCR, layout selection, parsing.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ExtractionError, Result};
use crate::layouts::{LayoutParser, LayoutRegistry};
use crate::models::document::{Document, DocumentType, ExtractionOutput, TextExtractionResult};
use crate::recognition::{DocumentSource, TextRecognizer};

/// Options narrowing which layout parsers are considered.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Restrict candidates to one document type. Absent means
    /// auto-detect across all registered parsers.
    pub document_type: Option<DocumentType>,

    /// Explicit layout ids within `document_type`. Explicitly requested
    /// layouts are honored regardless of score.
    pub layouts: Option<Vec<String>>,
}

/// The whole extraction pipeline over a recognizer and a registry.
pub struct DocumentExtractor {
    recognizer: TextRecognizer,
    registry: LayoutRegistry,
}

impl DocumentExtractor {
    /// Create an extractor. The registry is read-only from here on.
    pub fn new(recognizer: TextRecognizer, registry: LayoutRegistry) -> Self {
        Self {
            recognizer,
            registry,
        }
    }

    /// The registry backing this extractor.
    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Run OCR on the source and parse with the best-matching layout.
    pub async fn extract(
        &self,
        source: &DocumentSource,
        options: &ExtractOptions,
    ) -> Result<ExtractionOutput<Document>> {
        let result = self.recognizer.extract_text(source).await?;
        self.extract_from_result(&result, options)
    }

    /// Select and run a parser over an already-recognized result.
    pub fn extract_from_result(
        &self,
        result: &TextExtractionResult,
        options: &ExtractOptions,
    ) -> Result<ExtractionOutput<Document>> {
        let explicit = options.layouts.is_some();
        let candidates: Vec<&Arc<dyn LayoutParser>> =
            match (options.document_type, &options.layouts) {
                (Some(document_type), Some(layout_ids)) => layout_ids
                    .iter()
                    .filter_map(|id| self.registry.get(document_type, id))
                    .collect(),
                (Some(document_type), None) => self.registry.parsers_for(document_type),
                // Layout ids are only meaningful relative to a document
                // type; without one we auto-detect across everything
                // registered.
                (None, _) => self.registry.all().iter().collect(),
            };

        if candidates.is_empty() {
            return Err(ExtractionError::NoParserMatched.into());
        }

        let mut winner = candidates[0];
        let mut best_score = winner.match_score(result).clamp(0.0, 1.0);
        for &parser in &candidates[1..] {
            let score = parser.match_score(result).clamp(0.0, 1.0);
            debug!(
                "layout {}/{} scored {:.2}",
                parser.document_type(),
                parser.layout_id(),
                score
            );
            // Strict comparison: on ties the first-registered parser wins.
            if score > best_score {
                winner = parser;
                best_score = score;
            }
        }

        if !explicit && best_score <= 0.0 {
            return Err(ExtractionError::NoParserMatched.into());
        }

        info!(
            "selected layout {}/{} with score {:.2}",
            winner.document_type(),
            winner.layout_id(),
            best_score
        );

        let mut output = winner.parse(result)?;
        output.layout_id = Some(winner.layout_id().to_string());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use crate::error::{OcrBackendError, StorageError, TickexError};
    use crate::models::document::{Confidence, DocumentBase, TextBlock, WeighingTicket};
    use crate::recognition::{ObjectStore, OcrBackend, OcrInput};

    use super::*;

    struct NullBackend;

    #[async_trait]
    impl OcrBackend for NullBackend {
        async fn detect_text(
            &self,
            _input: OcrInput<'_>,
        ) -> std::result::Result<Vec<TextBlock>, OcrBackendError> {
            Ok(vec![])
        }
    }

    struct NullStore;

    #[async_trait]
    impl ObjectStore for NullStore {
        async fn get(
            &self,
            bucket: &str,
            key: &str,
        ) -> std::result::Result<Vec<u8>, StorageError> {
            Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
        }
    }

    /// Stub parser with a fixed score and type.
    struct StubParser {
        document_type: DocumentType,
        id: &'static str,
        score: f32,
    }

    impl StubParser {
        fn ticket(id: &'static str, score: f32) -> Self {
            Self {
                document_type: DocumentType::WeighingTicket,
                id,
                score,
            }
        }
    }

    impl LayoutParser for StubParser {
        fn document_type(&self) -> DocumentType {
            self.document_type
        }

        fn layout_id(&self) -> &'static str {
            self.id
        }

        fn match_score(&self, _result: &TextExtractionResult) -> f32 {
            self.score
        }

        fn parse(
            &self,
            result: &TextExtractionResult,
        ) -> std::result::Result<ExtractionOutput<Document>, ExtractionError> {
            Ok(ExtractionOutput {
                data: Document::WeighingTicket(WeighingTicket {
                    base: DocumentBase {
                        document_type: DocumentType::WeighingTicket,
                        raw_text: result.raw_text.clone(),
                        extraction_confidence: Confidence::High,
                        low_confidence_fields: vec![],
                        missing_required_fields: vec![],
                    },
                    ticket_number: None,
                    plate: None,
                    product: None,
                    supplier: None,
                    gross_weight: None,
                    gross_weight_at: None,
                    tare_weight: None,
                    tare_weight_at: None,
                    net_weight: None,
                }),
                review_required: false,
                review_reasons: vec![],
                layout_id: None,
            })
        }
    }

    fn extractor(parsers: Vec<StubParser>) -> DocumentExtractor {
        let mut builder = LayoutRegistry::builder();
        for parser in parsers {
            builder = builder.register(parser);
        }
        let recognizer = TextRecognizer::new(Arc::new(NullBackend), Arc::new(NullStore));
        DocumentExtractor::new(recognizer, builder.build())
    }

    fn result(raw_text: &str) -> TextExtractionResult {
        TextExtractionResult {
            raw_text: raw_text.to_string(),
            blocks: vec![],
        }
    }

    fn selected(extractor: &DocumentExtractor, options: &ExtractOptions) -> Option<String> {
        extractor
            .extract_from_result(&result("some text"), options)
            .unwrap()
            .layout_id
    }

    #[test]
    fn test_highest_scoring_parser_wins() {
        let extractor = extractor(vec![
            StubParser::ticket("layout-1", 0.4),
            StubParser::ticket("layout-2", 0.9),
        ]);
        assert_eq!(
            selected(&extractor, &ExtractOptions::default()).as_deref(),
            Some("layout-2")
        );
    }

    #[test]
    fn test_ties_go_to_the_first_registered_parser() {
        let extractor = extractor(vec![
            StubParser::ticket("layout-1", 0.5),
            StubParser::ticket("layout-2", 0.5),
        ]);
        assert_eq!(
            selected(&extractor, &ExtractOptions::default()).as_deref(),
            Some("layout-1")
        );
    }

    #[test]
    fn test_explicit_layouts_restrict_candidates() {
        let extractor = extractor(vec![
            StubParser::ticket("layout-1", 0.9),
            StubParser::ticket("layout-2", 0.1),
        ]);
        let options = ExtractOptions {
            document_type: Some(DocumentType::WeighingTicket),
            layouts: Some(vec!["layout-2".to_string()]),
        };
        assert_eq!(selected(&extractor, &options).as_deref(), Some("layout-2"));
    }

    #[test]
    fn test_explicit_layout_is_honored_at_zero_score() {
        let extractor = extractor(vec![StubParser::ticket("layout-1", 0.0)]);
        let options = ExtractOptions {
            document_type: Some(DocumentType::WeighingTicket),
            layouts: Some(vec!["layout-1".to_string()]),
        };
        assert_eq!(selected(&extractor, &options).as_deref(), Some("layout-1"));
    }

    #[test]
    fn test_auto_detect_with_all_zero_scores_matches_no_parser() {
        let extractor = extractor(vec![StubParser::ticket("layout-1", 0.0)]);
        let err = extractor
            .extract_from_result(&result("text"), &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TickexError::Extraction(ExtractionError::NoParserMatched)
        ));
    }

    #[test]
    fn test_empty_candidate_set_matches_no_parser() {
        let extractor = extractor(vec![StubParser::ticket("layout-1", 0.9)]);
        let options = ExtractOptions {
            document_type: Some(DocumentType::TransportManifest),
            layouts: None,
        };
        let err = extractor
            .extract_from_result(&result("text"), &options)
            .unwrap_err();
        assert!(matches!(
            err,
            TickexError::Extraction(ExtractionError::NoParserMatched)
        ));
    }

    #[test]
    fn test_unknown_explicit_layout_matches_no_parser() {
        let extractor = extractor(vec![StubParser::ticket("layout-1", 0.9)]);
        let options = ExtractOptions {
            document_type: Some(DocumentType::WeighingTicket),
            layouts: Some(vec!["layout-99".to_string()]),
        };
        let err = extractor
            .extract_from_result(&result("text"), &options)
            .unwrap_err();
        assert!(matches!(
            err,
            TickexError::Extraction(ExtractionError::NoParserMatched)
        ));
    }

    #[test]
    fn test_winner_stamps_its_layout_id() {
        let extractor = extractor(vec![StubParser::ticket("layout-1", 0.3)]);
        let output = extractor
            .extract_from_result(&result("text"), &ExtractOptions::default())
            .unwrap();
        assert_eq!(output.layout_id.as_deref(), Some("layout-1"));
    }

    #[test]
    fn test_builtin_auto_detect_routes_ticket_and_manifest() {
        let recognizer = TextRecognizer::new(Arc::new(NullBackend), Arc::new(NullStore));
        let registry = LayoutRegistry::builder().with_builtin_layouts().build();
        let extractor = DocumentExtractor::new(recognizer, registry);

        let ticket = extractor
            .extract_from_result(
                &result("Ticket: 1\nPlaca: ABC1D23\nPeso Líquido: 200,25 kg"),
                &ExtractOptions::default(),
            )
            .unwrap();
        assert!(matches!(ticket.data, Document::WeighingTicket(_)));

        let manifest = extractor
            .extract_from_result(
                &result("MTR: 9\nData de Emissão: 05/07/2024\nTransportador: Beta"),
                &ExtractOptions::default(),
            )
            .unwrap();
        assert!(matches!(manifest.data, Document::TransportManifest(_)));
        assert_eq!(manifest.layout_id.as_deref(), Some("layout-1"));
    }
}
