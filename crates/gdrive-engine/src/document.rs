//! Whole-content replacement planning for rich-text documents.
//!
//! A document body lives in one global index space starting at 1. Index 0 is
//! never addressable, and the last unit is the trailing newline the service
//! requires every body to keep. Replacement therefore deletes `[1, end - 1)`
//! and inserts the new text at 1, in that order.

use gdrive_types::{Document, DocumentRequest};

/// First addressable index of a document body.
pub const BODY_START: i64 = 1;

/// Trailing boundary of the body: the largest `end_index` of any element.
///
/// Elements can nest, so this is a max over reported end indices rather than
/// a count. Starts from [`BODY_START`] when nothing reports an end.
pub fn document_end_index(doc: &Document) -> i64 {
    doc.elements()
        .iter()
        .map(|el| el.end_index)
        .fold(BODY_START, i64::max)
}

/// Plan the edit batch that replaces all body text with `new_content`.
///
/// Always returns exactly two requests: a delete of `[1, max(1, end - 1))`
/// followed by an insert at 1. The delete collapses to an empty range on an
/// empty body instead of going negative.
pub fn plan_document_replacement(doc: &Document, new_content: &str) -> Vec<DocumentRequest> {
    let end_index = document_end_index(doc);
    let delete_end = (end_index - 1).max(BODY_START);

    vec![
        DocumentRequest::delete_range(BODY_START, delete_end),
        DocumentRequest::insert_text(BODY_START, new_content),
    ]
}

/// Concatenate every paragraph text run in body order.
///
/// Tables, section breaks and other non-paragraph elements contribute nothing.
pub fn extract_document_text(doc: &Document) -> String {
    let mut content = String::new();
    for element in doc.elements() {
        if let Some(paragraph) = &element.paragraph {
            for run in paragraph.elements.iter().filter_map(|el| el.text_run.as_ref()) {
                content.push_str(&run.content);
            }
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdrive_types::{Range, StructuralElement};
    use proptest::prelude::*;

    fn doc_ending_at(end_index: i64) -> Document {
        Document::with_content(
            "doc",
            vec![
                StructuralElement { end_index: 1, section_break: Some(serde_json::json!({})), ..Default::default() },
                StructuralElement::opaque(1, end_index),
            ],
        )
    }

    fn delete_range(requests: &[DocumentRequest]) -> Range {
        match &requests[0] {
            DocumentRequest::DeleteContentRange { range } => *range,
            other => panic!("expected delete first, got {other:?}"),
        }
    }

    #[test]
    fn test_replacement_scenario() {
        let requests = plan_document_replacement(&doc_ending_at(50), "Hello");
        assert_eq!(
            requests,
            vec![
                DocumentRequest::delete_range(1, 49),
                DocumentRequest::insert_text(1, "Hello"),
            ]
        );
    }

    #[test]
    fn test_end_index_is_max_not_last() {
        // A nested element reporting a larger end than the one after it
        let doc = Document::with_content(
            "doc",
            vec![
                StructuralElement::opaque(1, 30),
                StructuralElement::opaque(5, 12),
            ],
        );
        assert_eq!(document_end_index(&doc), 30);
    }

    #[test]
    fn test_empty_document_clamps_delete() {
        let doc = Document::default();
        assert_eq!(document_end_index(&doc), 1);
        let requests = plan_document_replacement(&doc, "x");
        assert_eq!(delete_range(&requests), Range::new(1, 1));

        // Only the section break and the required newline
        let requests = plan_document_replacement(&doc_ending_at(2), "");
        assert_eq!(delete_range(&requests), Range::new(1, 1));
        assert_eq!(requests[1], DocumentRequest::insert_text(1, ""));
    }

    #[test]
    fn test_extract_skips_non_paragraphs() {
        let doc = Document::with_content(
            "doc",
            vec![
                StructuralElement::paragraph(1, "one\n"),
                StructuralElement::opaque(5, 20),
                StructuralElement::paragraph(20, "two\n"),
            ],
        );
        assert_eq!(extract_document_text(&doc), "one\ntwo\n");
    }

    proptest! {
        #[test]
        fn delete_never_touches_reserved_units(end in -5i64..10_000, text in ".{0,40}") {
            let requests = plan_document_replacement(&doc_ending_at(end.max(1)), &text);
            let range = delete_range(&requests);
            let end_index = end.max(1);

            prop_assert_eq!(requests.len(), 2);
            prop_assert_eq!(range.start_index, 1);
            prop_assert!(range.end_index >= range.start_index);
            prop_assert_eq!(range.end_index, (end_index - 1).max(1));
            prop_assert!(range.end_index < end_index || end_index == 1);
            prop_assert_eq!(&requests[1], &DocumentRequest::insert_text(1, text.as_str()));
        }
    }
}
