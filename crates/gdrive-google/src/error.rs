//! Client error types.

use gdrive_engine::UpstreamError;
use serde::Deserialize;
use thiserror::Error;

/// Errors from talking to Google APIs or acquiring credentials.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never got a response (DNS, TLS, timeout, connection reset).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// No usable credentials, or the token exchange failed.
    #[error("credentials: {0}")]
    Credentials(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    Url(String),
}

impl ClientError {
    /// Attach the name of the remote call and flatten into the engine's error.
    pub fn upstream(self, operation: &str) -> UpstreamError {
        UpstreamError::new(operation, self)
    }
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Build an [`ClientError::Api`] from a failed response body.
///
/// Google wraps failures as `{"error": {"code", "message", "status"}}`; any
/// other body is passed through verbatim.
pub fn api_error(status: u16, body: &str) -> ClientError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => match env.error.status {
            Some(s) if !env.error.message.is_empty() => format!("{s}: {}", env.error.message),
            Some(s) => s,
            None => env.error.message,
        },
        Err(_) => body.trim().to_string(),
    };
    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_parses_google_envelope() {
        let body = r#"{"error":{"code":400,"message":"Invalid requests[0].deleteContentRange: The range cannot be empty.","status":"INVALID_ARGUMENT"}}"#;
        let err = api_error(400, body);
        assert_eq!(
            err.to_string(),
            "400: INVALID_ARGUMENT: Invalid requests[0].deleteContentRange: The range cannot be empty."
        );
    }

    #[test]
    fn test_api_error_passes_through_plain_body() {
        let err = api_error(502, "  Bad Gateway\n");
        assert_eq!(err.to_string(), "502: Bad Gateway");
    }

    #[test]
    fn test_upstream_keeps_operation_and_cause() {
        let err = api_error(404, r#"{"error":{"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#)
            .upstream("docs.documents.get");
        assert_eq!(err.operation, "docs.documents.get");
        assert!(err.cause.contains("NOT_FOUND"));
    }
}
