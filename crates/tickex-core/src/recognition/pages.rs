//! Splitting a multi-page PDF into single-page sub-documents.
//!
//! Used by the recognition service when the OCR backend rejects a
//! document as unsupported for synchronous processing.

use lopdf::Document;
use tracing::debug;

use crate::error::RecognitionError;

/// Split a PDF into one single-page document per page, in page order.
pub fn split_pages(bytes: &[u8]) -> Result<Vec<Vec<u8>>, RecognitionError> {
    let document =
        Document::load_mem(bytes).map_err(|e| RecognitionError::PageSplit(e.to_string()))?;

    // get_pages keys are 1-based page numbers in a BTreeMap, so iteration
    // order is page order.
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(RecognitionError::PageSplit("document has no pages".to_string()));
    }

    let mut pages = Vec::with_capacity(page_numbers.len());
    for keep in &page_numbers {
        let mut single = document.clone();
        let delete: Vec<u32> = page_numbers
            .iter()
            .copied()
            .filter(|number| number != keep)
            .collect();
        single.delete_pages(&delete);
        single.prune_objects();

        let mut buffer = Vec::new();
        single
            .save_to(&mut buffer)
            .map_err(|e| RecognitionError::PageSplit(e.to_string()))?;
        pages.push(buffer);
    }

    debug!("split document into {} single-page documents", pages.len());
    Ok(pages)
}


#[cfg(test)]
mod tests {
    use super::test_support::{contains_bytes, pdf_with_pages};
    use super::*;

    #[test]
    fn test_splits_into_one_document_per_page() {
        let bytes = pdf_with_pages(&["Page 1 line", "Page 2 line", "Page 3 line"]);
        let pages = split_pages(&bytes).unwrap();
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_pages_come_out_in_page_order() {
        let bytes = pdf_with_pages(&["Page 1 line", "Page 2 line", "Page 3 line"]);
        let pages = split_pages(&bytes).unwrap();

        for (index, page) in pages.iter().enumerate() {
            let marker = format!("(Page {} line)", index + 1);
            assert!(
                contains_bytes(page, marker.as_bytes()),
                "page {} does not carry its own content",
                index + 1
            );
        }
    }

    #[test]
    fn test_each_page_keeps_only_its_own_content() {
        let bytes = pdf_with_pages(&["Page 1 line", "Page 2 line"]);
        let pages = split_pages(&bytes).unwrap();

        assert!(contains_bytes(&pages[0], b"(Page 1 line)"));
        assert!(!contains_bytes(&pages[0], b"(Page 2 line)"));
        assert!(contains_bytes(&pages[1], b"(Page 2 line)"));
        assert!(!contains_bytes(&pages[1], b"(Page 1 line)"));
    }

    #[test]
    fn test_garbage_bytes_fail_with_page_split_error() {
        let err = split_pages(b"not a pdf").unwrap_err();
        assert!(matches!(err, RecognitionError::PageSplit(_)));
    }
}
