//! Transport/recycling manifest layout.

use crate::error::ExtractionError;
use crate::geometry::{
    DetectOptions, HeaderColumn, TableConfig, YRange, detect_columns, extract_table,
};
use crate::models::document::{
    Confidence, Document, DocumentBase, DocumentType, ExtractedField, ExtractionOutput,
    TextExtractionResult, TransportManifest, WasteItem,
};

use super::finalize::{FieldLedger, finalize};
use super::rules::dates::parse_date;
use super::rules::numbers::parse_locale_number;
use super::rules::patterns::*;
use super::rules::text::labeled_line;
use super::{LayoutParser, signature_score};

const ALL_FIELDS: &[&str] = &["manifest_number", "issue_date", "transporter", "items"];
const REQUIRED_FIELDS: &[&str] = &["manifest_number", "items"];

/// Offset below the detected header top where data rows start.
const BELOW_HEADER: f32 = 0.001;

/// Vertical gap after which trailing text (signatures, footers) is no
/// longer treated as an item continuation.
const ITEM_ROW_GAP: f32 = 0.1;

/// Table-shaped MTR manifest: number, issue date and transporter as
/// labeled fields, waste line-items under a dynamically located
/// `Item` / `Descrição` / `Quantidade` / `Unidade` header.
pub struct ManifestLayout1;

impl ManifestLayout1 {
    fn header_definitions() -> Vec<HeaderColumn> {
        vec![
            HeaderColumn::exact("item", "Item"),
            HeaderColumn::pattern("description", HEADER_DESCRIPTION.clone()),
            HeaderColumn::pattern("quantity", HEADER_QUANTITY.clone()),
            HeaderColumn::pattern("unit", HEADER_UNIT.clone()),
        ]
    }

    fn extract_items(result: &TextExtractionResult) -> Vec<WasteItem> {
        let Some(header) = detect_columns(
            &result.blocks,
            &Self::header_definitions(),
            &DetectOptions::default(),
        ) else {
            return Vec::new();
        };

        let config = TableConfig {
            anchor_column: "item".to_string(),
            columns: header.columns,
            y_range: Some(YRange {
                min: header.header_top + BELOW_HEADER,
                max: 1.0,
            }),
            y_tolerance: None,
            x_tolerance: None,
            max_row_gap: Some(ITEM_ROW_GAP),
        };

        extract_table(&result.blocks, &config)
            .rows
            .into_iter()
            .map(|row| WasteItem {
                item: row.get("item").cloned().unwrap_or_default(),
                description: row.get("description").cloned().unwrap_or_default(),
                quantity: row.get("quantity").and_then(|q| parse_locale_number(q)),
                unit: row
                    .get("unit")
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty()),
            })
            .collect()
    }
}

impl LayoutParser for ManifestLayout1 {
    fn document_type(&self) -> DocumentType {
        DocumentType::TransportManifest
    }

    fn layout_id(&self) -> &'static str {
        "layout-1"
    }

    fn match_score(&self, result: &TextExtractionResult) -> f32 {
        signature_score(
            &result.raw_text,
            &[
                &MANIFEST_NUMBER,
                &ISSUE_DATE,
                &TRANSPORTER,
                &HEADER_DESCRIPTION,
                &HEADER_QUANTITY,
            ],
        )
    }

    fn parse(
        &self,
        result: &TextExtractionResult,
    ) -> Result<ExtractionOutput<Document>, ExtractionError> {
        let text = &result.raw_text;
        let mut ledger = FieldLedger::new();

        let manifest_number = labeled_line(&MANIFEST_NUMBER, text);
        let issue_date = ISSUE_DATE.captures(text).and_then(|caps| {
            let value = parse_date(caps.get(1)?.as_str())?;
            Some(ExtractedField::high(
                value,
                caps.get(0).map(|m| m.as_str().to_string()),
            ))
        });
        let transporter = labeled_line(&TRANSPORTER, text);
        let items = Self::extract_items(result);

        ledger.record_field("manifest_number", &manifest_number);
        ledger.record_field("issue_date", &issue_date);
        ledger.record_field("transporter", &transporter);
        if !items.is_empty() {
            ledger.record("items", Confidence::High);
        }

        let verdict = finalize(ALL_FIELDS, REQUIRED_FIELDS, &ledger);
        let data = TransportManifest {
            base: DocumentBase {
                document_type: DocumentType::TransportManifest,
                raw_text: result.raw_text.clone(),
                extraction_confidence: verdict.extraction_confidence,
                low_confidence_fields: verdict.low_confidence_fields,
                missing_required_fields: verdict.missing_required_fields,
            },
            manifest_number,
            issue_date,
            transporter,
            items,
        };

        Ok(ExtractionOutput {
            data: Document::TransportManifest(data),
            review_required: verdict.review_required,
            review_reasons: verdict.review_reasons,
            layout_id: None,
        })
    }
}
