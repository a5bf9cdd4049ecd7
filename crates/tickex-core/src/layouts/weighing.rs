//! Weighing ticket layouts.

use crate::error::ExtractionError;
use crate::models::document::{
    Document, DocumentBase, DocumentType, ExtractedField, ExtractionOutput, TextExtractionResult,
    WeighingTicket,
};

use super::finalize::{FieldLedger, finalize};
use super::rules::dates::find_datetime_after;
use super::rules::numbers::labeled_weight;
use super::rules::patterns::*;
use super::rules::text::labeled_line;
use super::{LayoutParser, signature_score};

const ALL_FIELDS: &[&str] = &[
    "ticket_number",
    "plate",
    "product",
    "supplier",
    "gross_weight",
    "gross_weight_at",
    "tare_weight",
    "tare_weight_at",
    "net_weight",
];

const REQUIRED_FIELDS: &[&str] = &["ticket_number", "net_weight"];

fn build_output(
    result: &TextExtractionResult,
    ledger: &FieldLedger,
    ticket: WeighingTicketFields,
) -> ExtractionOutput<Document> {
    let verdict = finalize(ALL_FIELDS, REQUIRED_FIELDS, ledger);

    let data = WeighingTicket {
        base: DocumentBase {
            document_type: DocumentType::WeighingTicket,
            raw_text: result.raw_text.clone(),
            extraction_confidence: verdict.extraction_confidence,
            low_confidence_fields: verdict.low_confidence_fields,
            missing_required_fields: verdict.missing_required_fields,
        },
        ticket_number: ticket.ticket_number,
        plate: ticket.plate,
        product: ticket.product,
        supplier: ticket.supplier,
        gross_weight: ticket.gross_weight,
        gross_weight_at: ticket.gross_weight_at,
        tare_weight: ticket.tare_weight,
        tare_weight_at: ticket.tare_weight_at,
        net_weight: ticket.net_weight,
    };

    ExtractionOutput {
        data: Document::WeighingTicket(data),
        review_required: verdict.review_required,
        review_reasons: verdict.review_reasons,
        layout_id: None,
    }
}

#[derive(Default)]
struct WeighingTicketFields {
    ticket_number: Option<ExtractedField<String>>,
    plate: Option<ExtractedField<String>>,
    product: Option<ExtractedField<String>>,
    supplier: Option<ExtractedField<String>>,
    gross_weight: Option<ExtractedField<crate::models::document::Weight>>,
    gross_weight_at: Option<ExtractedField<chrono::NaiveDateTime>>,
    tare_weight: Option<ExtractedField<crate::models::document::Weight>>,
    tare_weight_at: Option<ExtractedField<chrono::NaiveDateTime>>,
    net_weight: Option<ExtractedField<crate::models::document::Weight>>,
}

/// The sampled pt-BR labeled template: `Ticket:`, `Placa:`, `Produto:`,
/// `Fornecedor:`, labeled weights with a generic `Data / Hora:` line per
/// weighing.
pub struct WeighingLayout1;

impl LayoutParser for WeighingLayout1 {
    fn document_type(&self) -> DocumentType {
        DocumentType::WeighingTicket
    }

    fn layout_id(&self) -> &'static str {
        "layout-1"
    }

    fn match_score(&self, result: &TextExtractionResult) -> f32 {
        signature_score(
            &result.raw_text,
            &[
                &TICKET_NUMBER,
                &PLATE,
                &GROSS_WEIGHT,
                &TARE_WEIGHT,
                &NET_WEIGHT,
                &DATE_TIME_LABEL,
            ],
        )
    }

    fn parse(
        &self,
        result: &TextExtractionResult,
    ) -> Result<ExtractionOutput<Document>, ExtractionError> {
        let text = &result.raw_text;
        let mut ledger = FieldLedger::new();
        let mut fields = WeighingTicketFields::default();

        fields.ticket_number = labeled_line(&TICKET_NUMBER, text);
        fields.plate = labeled_line(&PLATE, text);
        fields.product = labeled_line(&PRODUCT, text);
        fields.supplier = labeled_line(&SUPPLIER, text);

        // Each weighing searches for the generic timestamp label from its
        // own match position onwards.
        if let Some((weight, anchor)) = labeled_weight(&GROSS_WEIGHT, text) {
            fields.gross_weight = Some(weight);
            fields.gross_weight_at = find_datetime_after(text, anchor);
        }
        if let Some((weight, anchor)) = labeled_weight(&TARE_WEIGHT, text) {
            fields.tare_weight = Some(weight);
            fields.tare_weight_at = find_datetime_after(text, anchor);
        }
        if let Some((weight, _)) = labeled_weight(&NET_WEIGHT, text) {
            fields.net_weight = Some(weight);
        }

        ledger.record_field("ticket_number", &fields.ticket_number);
        ledger.record_field("plate", &fields.plate);
        ledger.record_field("product", &fields.product);
        ledger.record_field("supplier", &fields.supplier);
        ledger.record_field("gross_weight", &fields.gross_weight);
        ledger.record_field("gross_weight_at", &fields.gross_weight_at);
        ledger.record_field("tare_weight", &fields.tare_weight);
        ledger.record_field("tare_weight_at", &fields.tare_weight_at);
        ledger.record_field("net_weight", &fields.net_weight);

        Ok(build_output(result, &ledger, fields))
    }
}

/// Uppercase scale-house template: `PESO ENTRADA` / `PESO SAIDA` /
/// `PESO LIQUIDO` plus a `BALANCA` identifier. Its ticket number can
/// come from an unlabeled digit run, at low confidence.
pub struct WeighingLayout2;

impl WeighingLayout2 {
    fn ticket_number(text: &str) -> Option<ExtractedField<String>> {
        if let Some(field) = labeled_line(&TICKET_NUMBER, text) {
            return Some(field);
        }
        let caps = BARE_TICKET_NUMBER.captures(text)?;
        let matched = caps.get(1)?;
        Some(ExtractedField::low(
            matched.as_str().to_string(),
            Some(matched.as_str().to_string()),
        ))
    }
}

impl LayoutParser for WeighingLayout2 {
    fn document_type(&self) -> DocumentType {
        DocumentType::WeighingTicket
    }

    fn layout_id(&self) -> &'static str {
        "layout-2"
    }

    fn match_score(&self, result: &TextExtractionResult) -> f32 {
        signature_score(
            &result.raw_text,
            &[&ENTRY_WEIGHT, &EXIT_WEIGHT, &NET_WEIGHT, &SCALE_ID],
        )
    }

    fn parse(
        &self,
        result: &TextExtractionResult,
    ) -> Result<ExtractionOutput<Document>, ExtractionError> {
        let text = &result.raw_text;
        let mut ledger = FieldLedger::new();
        let mut fields = WeighingTicketFields::default();

        fields.ticket_number = Self::ticket_number(text);
        fields.plate = labeled_line(&PLATE, text);

        // Entry/exit weighings map onto gross/tare.
        if let Some((weight, anchor)) = labeled_weight(&ENTRY_WEIGHT, text) {
            fields.gross_weight = Some(weight);
            fields.gross_weight_at = find_datetime_after(text, anchor);
        }
        if let Some((weight, anchor)) = labeled_weight(&EXIT_WEIGHT, text) {
            fields.tare_weight = Some(weight);
            fields.tare_weight_at = find_datetime_after(text, anchor);
        }
        if let Some((weight, _)) = labeled_weight(&NET_WEIGHT, text) {
            fields.net_weight = Some(weight);
        }

        ledger.record_field("ticket_number", &fields.ticket_number);
        ledger.record_field("plate", &fields.plate);
        ledger.record_field("gross_weight", &fields.gross_weight);
        ledger.record_field("gross_weight_at", &fields.gross_weight_at);
        ledger.record_field("tare_weight", &fields.tare_weight);
        ledger.record_field("tare_weight_at", &fields.tare_weight_at);
        ledger.record_field("net_weight", &fields.net_weight);

        Ok(build_output(result, &ledger, fields))
    }
}
