//! Parameter coercion and result formatting.

use gdrive_engine::EngineError;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

// ============================================================================
// Coercion
// ============================================================================

/// Read an optional integer parameter.
///
/// Accepts JSON integers, floats with no fractional part, and numeric strings.
/// `null` or absence yields `default`.
pub fn coerce_integer(name: &str, raw: Option<&Value>, default: i64) -> Result<i64, EngineError> {
    let invalid = || EngineError::invalid_argument(format!("{name} must be an integer"));
    match raw {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                n.as_f64().and_then(integral).ok_or_else(invalid)
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
                .ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64).then_some(f as i64)
}

// ============================================================================
// Results
// ============================================================================

pub fn success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Error result text: `"<prefix>: [<kind>] <cause>"`.
pub fn failure(prefix: &str, err: &EngineError) -> CallToolResult {
    tracing::warn!(kind = err.kind(), error = %err, "{prefix}");
    CallToolResult::error(vec![Content::text(format!("{prefix}: [{}] {err}", err.kind()))])
}

/// Serialize a payload as compact JSON text.
pub fn json_result<T: serde::Serialize>(payload: &T) -> CallToolResult {
    match serde_json::to_string(payload) {
        Ok(text) => success(text),
        Err(e) => CallToolResult::error(vec![Content::text(format!("Failed to serialize result: {e}"))]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_integer_forms() {
        assert_eq!(coerce_integer("n", None, 10).unwrap(), 10);
        assert_eq!(coerce_integer("n", Some(&Value::Null), 10).unwrap(), 10);
        assert_eq!(coerce_integer("n", Some(&json!(3)), 10).unwrap(), 3);
        assert_eq!(coerce_integer("n", Some(&json!(3.0)), 10).unwrap(), 3);
        assert_eq!(coerce_integer("n", Some(&json!("42")), 10).unwrap(), 42);
        assert_eq!(coerce_integer("n", Some(&json!(" 7.0 ")), 10).unwrap(), 7);
        assert_eq!(coerce_integer("n", Some(&json!(-1)), 10).unwrap(), -1);
    }

    #[test]
    fn test_coerce_integer_rejects() {
        for bad in [json!(2.5), json!("abc"), json!(true), json!([1]), json!({"n": 1})] {
            let err = coerce_integer("slideIndex", Some(&bad), 0).unwrap_err();
            assert_eq!(err.kind(), "invalid_argument");
            assert_eq!(err.to_string(), "slideIndex must be an integer");
        }
    }

    #[test]
    fn test_failure_text() {
        let err = EngineError::OutOfRange { index: 3, count: 2 };
        let result = failure("Failed to update presentation", &err);
        assert_eq!(result.is_error, Some(true));
        let text = result.content[0].as_text().map(|t| t.text.clone()).unwrap();
        assert_eq!(
            text,
            "Failed to update presentation: [out_of_range] slide index 3 is out of range (0-1)"
        );
    }
}
