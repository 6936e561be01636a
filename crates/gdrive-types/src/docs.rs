//! Docs v1 document structure and batch-update requests.

use serde::{Deserialize, Serialize};

/// A rich-text document as returned by `documents.get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Body,
}

impl Document {
    /// Build a document from its body elements (mostly for tests and fakes).
    pub fn with_content(document_id: impl Into<String>, content: Vec<StructuralElement>) -> Self {
        Self {
            document_id: document_id.into(),
            title: String::new(),
            body: Body { content },
        }
    }

    /// Structural elements in index order.
    pub fn elements(&self) -> &[StructuralElement] {
        &self.body.content
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One element of the body, spanning `[start_index, end_index)`.
///
/// The first element of a real document is a section break that only reports
/// an end index, hence the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_break: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<serde_json::Value>,
}

impl StructuralElement {
    /// A paragraph holding a single text run.
    pub fn paragraph(start_index: i64, text: impl Into<String>) -> Self {
        let content: String = text.into();
        let end_index = start_index + content.encode_utf16().count() as i64;
        Self {
            start_index,
            end_index,
            paragraph: Some(Paragraph {
                elements: vec![ParagraphElement {
                    start_index,
                    end_index,
                    text_run: Some(TextRun { content }),
                }],
            }),
            ..Default::default()
        }
    }

    /// A non-text element occupying `[start_index, end_index)`.
    pub fn opaque(start_index: i64, end_index: i64) -> Self {
        Self {
            start_index,
            end_index,
            table: Some(serde_json::Value::Object(Default::default())),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

/// Half-open index range `[start_index, end_index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: i64,
    pub end_index: i64,
}

impl Range {
    pub fn new(start_index: i64, end_index: i64) -> Self {
        Self { start_index, end_index }
    }

    /// Number of index units covered (never negative).
    pub fn len(&self) -> i64 {
        (self.end_index - self.start_index).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: i64,
}

/// One positional edit in a document batch.
///
/// Serializes in the API's one-of shape, e.g.
/// `{"deleteContentRange": {"range": {...}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentRequest {
    DeleteContentRange { range: Range },
    InsertText { location: Location, text: String },
}

impl DocumentRequest {
    pub fn delete_range(start_index: i64, end_index: i64) -> Self {
        Self::DeleteContentRange {
            range: Range::new(start_index, end_index),
        }
    }

    pub fn insert_text(index: i64, text: impl Into<String>) -> Self {
        Self::InsertText {
            location: Location { index },
            text: text.into(),
        }
    }

    /// True when applying this request would not change the document.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::DeleteContentRange { range } => range.is_empty(),
            Self::InsertText { text, .. } => text.is_empty(),
        }
    }
}

/// Body of `documents.batchUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateDocumentRequest {
    pub requests: Vec<DocumentRequest>,
}
