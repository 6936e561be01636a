//! Spreadsheet value shaping.

use serde_json::Value;

use crate::error::{EngineError, Result};

/// Coerce a JSON argument into rows of cells.
///
/// The argument must be an array whose every element is itself an array.
pub fn rows_from_json(values: &Value) -> Result<Vec<Vec<Value>>> {
    let rows = values.as_array().ok_or_else(|| {
        EngineError::invalid_argument("values must be a 2D array")
    })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_array().cloned().ok_or_else(|| {
                EngineError::invalid_argument(format!("each row must be an array (row {i} is not)"))
            })
        })
        .collect()
}
