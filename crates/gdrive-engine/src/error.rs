//! Error taxonomy for engine operations.
//!
//! Every failure a caller can see falls into one of four kinds. The tool
//! surface renders them as text; nothing here is fatal to the process.

use thiserror::Error;

/// A remote read or write that was rejected, timed out, or came back malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation}: {cause}")]
pub struct UpstreamError {
    /// Remote call that failed, e.g. `docs.documents.get`.
    pub operation: String,
    /// Underlying cause as reported by the transport or the service.
    pub cause: String,
}

impl UpstreamError {
    pub fn new(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Errors surfaced by [`crate::Workspace`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Missing or empty identifier or parameter, caught before any remote call.
    #[error("{0}")]
    InvalidArgument(String),

    /// Slide index outside `[0, count)`.
    #[error("{}", out_of_range_message(.index, .count))]
    OutOfRange { index: i64, count: usize },

    /// Remote read or write failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The caller cancelled while the operation was pending.
    #[error("operation cancelled")]
    Cancelled,
}

fn out_of_range_message(index: &i64, count: &usize) -> String {
    if *count == 0 {
        format!("slide index {index} is out of range (presentation has no slides)")
    } else {
        format!("slide index {index} is out of range (0-{})", count - 1)
    }
}

impl EngineError {
    /// Stable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::OutOfRange { .. } => "out_of_range",
            Self::Upstream(_) => "upstream_failure",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject an empty (or whitespace-only) required string, returning it trimmed.
pub fn require_non_empty<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidArgument(format!("{what} is empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_states_bound() {
        let err = EngineError::OutOfRange { index: 5, count: 3 };
        assert_eq!(err.to_string(), "slide index 5 is out of range (0-2)");
        assert_eq!(err.kind(), "out_of_range");

        let err = EngineError::OutOfRange { index: 0, count: 0 };
        assert!(err.to_string().contains("no slides"));
    }

    #[test]
    fn test_upstream_keeps_cause() {
        let err: EngineError = UpstreamError::new("docs.documents.get", "404 Not Found").into();
        assert_eq!(err.kind(), "upstream_failure");
        assert_eq!(err.to_string(), "docs.documents.get: 404 Not Found");
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("document ID", "abc"), Ok("abc"));
        assert_eq!(require_non_empty("document ID", " abc\n"), Ok("abc"));
        let err = require_non_empty("document ID", "  ").unwrap_err();
        assert_eq!(err, EngineError::InvalidArgument("document ID is empty".into()));
    }
}
