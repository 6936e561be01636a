//! Sheets v4 value ranges.

use serde::{Deserialize, Serialize};

/// A rectangular block of cell values, row-major.
///
/// Cells stay as raw JSON values; the API returns strings for formatted values
/// and accepts strings, numbers and booleans on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    pub fn rows(values: Vec<Vec<serde_json::Value>>) -> Self {
        Self {
            range: None,
            major_dimension: None,
            values,
        }
    }
}
