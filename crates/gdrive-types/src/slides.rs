//! Slides v1 presentation structure and batch-update requests.

use serde::{Deserialize, Serialize};

use crate::docs::TextRun;

/// A slide deck as returned by `presentations.get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default)]
    pub presentation_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Page>,
}

impl Presentation {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&Page> {
        self.slides.get(index)
    }
}

/// One slide. Page elements keep the order the API reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    #[serde(default)]
    pub object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<serde_json::Value>,
}

impl PageElement {
    /// A shape whose text body holds `text` as one run plus a paragraph marker.
    pub fn text_box(object_id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let end_index = text.encode_utf16().count() as i64;
        Self {
            object_id: object_id.into(),
            shape: Some(Shape {
                shape_type: Some("TEXT_BOX".to_string()),
                text: Some(TextContent {
                    text_elements: vec![
                        TextElement {
                            start_index: 0,
                            end_index,
                            paragraph_marker: Some(serde_json::Value::Object(Default::default())),
                            ..Default::default()
                        },
                        TextElement {
                            start_index: 0,
                            end_index,
                            text_run: Some(TextRun { content: text }),
                            ..Default::default()
                        },
                    ],
                }),
            }),
            ..Default::default()
        }
    }

    /// A shape with no text body.
    pub fn blank_shape(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            shape: Some(Shape {
                shape_type: Some("RECTANGLE".to_string()),
                text: None,
            }),
            ..Default::default()
        }
    }

    /// The shape's text body, if it owns one with at least one text element.
    pub fn text_body(&self) -> Option<&TextContent> {
        self.shape
            .as_ref()
            .and_then(|shape| shape.text.as_ref())
            .filter(|text| !text.text_elements.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
}

impl TextContent {
    /// Concatenated text runs, skipping markers and auto text.
    pub fn plain_text(&self) -> String {
        self.text_elements
            .iter()
            .filter_map(|el| el.text_run.as_ref())
            .map(|run| run.content.as_str())
            .collect()
    }
}

/// A literal run or a structural marker inside a text body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_marker: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeType {
    All,
    FixedRange,
    FromStartIndex,
}

/// Text range within one shape. `All` carries no indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    #[serde(rename = "type")]
    pub range_type: RangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<i64>,
}

impl TextRange {
    pub fn all() -> Self {
        Self {
            range_type: RangeType::All,
            start_index: None,
            end_index: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTextRequest {
    pub object_id: String,
    pub text_range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTextRequest {
    pub object_id: String,
    pub text: String,
    pub insertion_index: i64,
}

/// One edit in a presentation batch, in the API's one-of shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationRequest {
    DeleteText(DeleteTextRequest),
    InsertText(InsertTextRequest),
}

impl PresentationRequest {
    /// Clear the whole text extent of a shape.
    pub fn delete_all_text(object_id: impl Into<String>) -> Self {
        Self::DeleteText(DeleteTextRequest {
            object_id: object_id.into(),
            text_range: TextRange::all(),
        })
    }

    pub fn insert_text(object_id: impl Into<String>, insertion_index: i64, text: impl Into<String>) -> Self {
        Self::InsertText(InsertTextRequest {
            object_id: object_id.into(),
            text: text.into(),
            insertion_index,
        })
    }

    /// Object the request targets.
    pub fn object_id(&self) -> &str {
        match self {
            Self::DeleteText(req) => &req.object_id,
            Self::InsertText(req) => &req.object_id,
        }
    }
}

/// Body of `presentations.batchUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdatePresentationRequest {
    pub requests: Vec<PresentationRequest>,
}
