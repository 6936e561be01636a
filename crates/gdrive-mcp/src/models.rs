//! MCP request and response types.
//!
//! Wire names are camelCase. Numeric parameters arrive as raw JSON and are
//! coerced by the handlers, so clients that send `"5"` or `5.0` still work.

use gdrive_types::DriveFile;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Drive
// ============================================================================

/// Search files by name.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilesRequest {
    #[schemars(description = "File name or keyword to search")]
    pub query: String,
    #[serde(default)]
    #[schemars(with = "Option<f64>", description = "Maximum number of files to retrieve (default: 10)")]
    pub max_results: Option<Value>,
}

/// List the contents of a folder.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesRequest {
    #[serde(default)]
    #[schemars(description = "The ID of the folder to list files from. If empty, lists files in My Drive root")]
    pub folder_id: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<f64>", description = "Maximum number of files to retrieve (default: 10)")]
    pub max_results: Option<Value>,
}

/// Result of `search_files` and `list_files`.
#[derive(Debug, Serialize)]
pub struct FileListing {
    pub files: Vec<DriveFile>,
    pub count: usize,
}

impl From<Vec<DriveFile>> for FileListing {
    fn from(files: Vec<DriveFile>) -> Self {
        Self {
            count: files.len(),
            files,
        }
    }
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetDocumentRequest {
    #[schemars(description = "The ID of the Google Document")]
    pub document_id: String,
}

/// Replace the whole body of a document.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceDocumentRequest {
    #[schemars(description = "The ID of the Google Document")]
    pub document_id: String,
    #[schemars(description = "The new content for the document")]
    pub content: String,
}

// ============================================================================
// Presentations
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPresentationRequest {
    #[schemars(description = "The ID of the Google Slides presentation")]
    pub presentation_id: String,
}

/// Rewrite the title and body of one slide.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSlideRequest {
    #[schemars(description = "The ID of the Google Slides presentation")]
    pub presentation_id: String,
    #[serde(default)]
    #[schemars(with = "Option<f64>", description = "The index of the slide to update (0-based, default: 0)")]
    pub slide_index: Option<Value>,
    #[schemars(description = "The title for the slide")]
    pub title: String,
    #[schemars(description = "The content for the slide")]
    pub content: String,
}

// ============================================================================
// Spreadsheets
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetSpreadsheetRequest {
    #[schemars(description = "The ID of the Google Spreadsheet")]
    pub spreadsheet_id: String,
    #[schemars(description = "The range to retrieve (e.g., 'Sheet1!A1:C10')")]
    pub range: String,
}

/// Result of `get_spreadsheet`.
#[derive(Debug, Serialize)]
pub struct SpreadsheetValues {
    pub values: Vec<Vec<Value>>,
    pub range: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpreadsheetRequest {
    #[schemars(description = "The ID of the Google Spreadsheet")]
    pub spreadsheet_id: String,
    #[schemars(description = "The range to update (e.g., 'Sheet1!A1:C10')")]
    pub range: String,
    #[schemars(description = "2D array of values to write")]
    pub values: Value,
}
