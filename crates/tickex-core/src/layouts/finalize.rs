//! Extraction finalizer: aggregates field-level confidence and derives
//! the review-required verdict.

use crate::models::document::{Confidence, ExtractedField};

/// Record of every field a parser actually produced.
#[derive(Debug, Default)]
pub struct FieldLedger {
    produced: Vec<(String, Confidence)>,
}

impl FieldLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a produced field with its confidence.
    pub fn record(&mut self, name: &str, confidence: Confidence) {
        self.produced.push((name.to_string(), confidence));
    }

    /// Record an optional field if it was produced.
    pub fn record_field<T>(&mut self, name: &str, field: &Option<ExtractedField<T>>) {
        if let Some(field) = field {
            self.record(name, field.confidence);
        }
    }

    fn confidence_of(&self, name: &str) -> Option<Confidence> {
        self.produced
            .iter()
            .find(|(produced, _)| produced == name)
            .map(|(_, confidence)| *confidence)
    }
}

/// Aggregated verdict over one parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    pub extraction_confidence: Confidence,
    pub low_confidence_fields: Vec<String>,
    pub missing_required_fields: Vec<String>,
    pub review_required: bool,
    pub review_reasons: Vec<String>,
}

/// Derive the extraction verdict from the ledger.
///
/// Both field lists come out in `all_fields` order. The result is high
/// confidence iff nothing required is missing and nothing produced is
/// below high confidence.
pub fn finalize(all_fields: &[&str], required_fields: &[&str], ledger: &FieldLedger) -> Finalized {
    let mut missing_required_fields = Vec::new();
    let mut low_confidence_fields = Vec::new();

    for field in all_fields {
        match ledger.confidence_of(field) {
            None => {
                if required_fields.contains(field) {
                    missing_required_fields.push(field.to_string());
                }
            }
            Some(Confidence::High) => {}
            Some(_) => low_confidence_fields.push(field.to_string()),
        }
    }

    let mut review_reasons = Vec::new();
    if !missing_required_fields.is_empty() {
        review_reasons.push(format!(
            "Missing required fields: {}",
            missing_required_fields.join(", ")
        ));
    }
    if !low_confidence_fields.is_empty() {
        review_reasons.push(format!(
            "Low confidence fields: {}",
            low_confidence_fields.join(", ")
        ));
    }

    let review_required = !missing_required_fields.is_empty() || !low_confidence_fields.is_empty();
    let extraction_confidence = if review_required {
        Confidence::Low
    } else {
        Confidence::High
    };

    Finalized {
        extraction_confidence,
        low_confidence_fields,
        missing_required_fields,
        review_required,
        review_reasons,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_all_fields_present_and_high_needs_no_review() {
        let mut ledger = FieldLedger::new();
        ledger.record("ticket_number", Confidence::High);
        ledger.record("net_weight", Confidence::High);

        let verdict = finalize(&["ticket_number", "net_weight"], &["net_weight"], &ledger);

        assert_eq!(verdict.extraction_confidence, Confidence::High);
        assert!(!verdict.review_required);
        assert!(verdict.review_reasons.is_empty());
    }

    #[test]
    fn test_missing_required_field_forces_review() {
        let mut ledger = FieldLedger::new();
        ledger.record("ticket_number", Confidence::High);

        let verdict = finalize(&["ticket_number", "net_weight"], &["net_weight"], &ledger);

        assert_eq!(verdict.missing_required_fields, vec!["net_weight"]);
        assert_eq!(verdict.extraction_confidence, Confidence::Low);
        assert!(verdict.review_required);
        assert_eq!(
            verdict.review_reasons,
            vec!["Missing required fields: net_weight"]
        );
    }

    #[test]
    fn test_missing_optional_field_is_fine() {
        let mut ledger = FieldLedger::new();
        ledger.record("net_weight", Confidence::High);

        let verdict = finalize(&["plate", "net_weight"], &["net_weight"], &ledger);
        assert!(!verdict.review_required);
    }

    #[test]
    fn test_low_confidence_field_forces_review() {
        let mut ledger = FieldLedger::new();
        ledger.record("ticket_number", Confidence::Low);
        ledger.record("net_weight", Confidence::High);

        let verdict = finalize(&["ticket_number", "net_weight"], &["net_weight"], &ledger);

        assert_eq!(verdict.low_confidence_fields, vec!["ticket_number"]);
        assert!(verdict.review_required);
        assert_eq!(
            verdict.review_reasons,
            vec!["Low confidence fields: ticket_number"]
        );
    }

    #[test]
    fn test_field_lists_follow_all_fields_order() {
        let mut ledger = FieldLedger::new();
        ledger.record("b", Confidence::Low);
        ledger.record("a", Confidence::Low);

        let verdict = finalize(&["a", "b", "c", "d"], &["d", "c"], &ledger);
        assert_eq!(verdict.low_confidence_fields, vec!["a", "b"]);
        assert_eq!(verdict.missing_required_fields, vec!["c", "d"]);
        assert_eq!(verdict.review_reasons.len(), 2);
    }
}
