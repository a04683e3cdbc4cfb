//! Error types for all OpenRouter crates.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors from OpenRouter client operations.
#[derive(Debug, thiserror::Error)]
pub enum OpenRouterError {
    /// Network-level failure (connection reset, DNS, TLS, timeout) before or
    /// while exchanging the request. Not classified further.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The service answered a non-success status with a structured error envelope.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The service answered a non-success status whose body is not an error envelope.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// Reading an established stream failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// A synchronous method was handed a request with `stream` enabled.
    #[error("streaming is not supported with this method")]
    StreamNotSupported,
    /// The request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    /// A success response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl OpenRouterError {
    /// The HTTP status attached to this error, if the service answered at all.
    ///
    /// For [`ApiError`] this is the service-defined `code`, which mirrors the
    /// HTTP status for OpenRouter.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) if e.code > 0 => u16::try_from(e.code).ok(),
            Self::Request(e) => Some(e.status),
            _ => None,
        }
    }
}

/// Structured error returned by the OpenRouter API.
///
/// Wire shape: `{"error": {"code": 400, "message": "...", "metadata": {...}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Service-defined error code; `0` when the service omitted it.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Provider-specific details (e.g. moderation reasons, raw upstream error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

fn is_zero(code: &i64) -> bool {
    *code == 0
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code > 0 {
            write!(
                f,
                "error, status code: {}, message: {}, metadata: {:?}",
                self.code, self.message, self.metadata
            )
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for ApiError {}

/// Envelope wrapping an [`ApiError`] in an error response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error, when the body carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// A non-success response that did not carry an [`ApiError`] envelope.
///
/// Keeps the raw status and body for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error(
    "error, status code: {status}, status: {status_text}, body: {}",
    String::from_utf8_lossy(.body)
)]
pub struct RequestError {
    /// Numeric HTTP status.
    pub status: u16,
    /// Canonical reason phrase for the status (may be empty for unknown codes).
    pub status_text: String,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Why the body could not be read as an error envelope, if it failed to parse.
    #[source]
    pub source: Option<serde_json::Error>,
}

/// Errors surfaced by a stream reader after the stream was established.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Reading the next bytes from the transport failed.
    #[error("error reading stream: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A single line exceeded the configured maximum length.
    #[error("stream line exceeds {limit} bytes")]
    LineTooLong {
        /// Configured maximum line length in bytes.
        limit: usize,
    },
    /// The reader was closed; no further chunks will be produced.
    #[error("stream is closed")]
    Closed,
    /// A previous read failed; the stream cannot make further progress.
    #[error("stream already failed")]
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_with_code_includes_details() {
        let err = ApiError {
            code: 400,
            message: "Invalid request".into(),
            metadata: None,
        };
        let s = err.to_string();
        assert!(s.contains("status code: 400"));
        assert!(s.contains("Invalid request"));
    }

    #[test]
    fn api_error_display_without_code_is_message() {
        let err = ApiError {
            code: 0,
            message: "Internal server error".into(),
            metadata: None,
        };
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn error_response_parses_envelope() {
        let body = r#"{"error":{"code":402,"message":"Insufficient credits","metadata":{"provider_name":"OpenAI"}}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        let err = parsed.error.unwrap();
        assert_eq!(err.code, 402);
        assert_eq!(err.message, "Insufficient credits");
        assert_eq!(
            err.metadata.unwrap()["provider_name"],
            serde_json::json!("OpenAI")
        );
    }

    #[test]
    fn error_response_without_error_field() {
        let parsed: ErrorResponse = serde_json::from_str(r#"{"detail":"nope"}"#).unwrap();
        assert!(parsed.error.is_none());
    }

    #[test]
    fn request_error_display_includes_status_and_body() {
        let err = RequestError {
            status: 502,
            status_text: "Bad Gateway".into(),
            body: b"upstream exploded".to_vec(),
            source: None,
        };
        let s = err.to_string();
        assert!(s.contains("502"));
        assert!(s.contains("Bad Gateway"));
        assert!(s.contains("upstream exploded"));
    }

    #[test]
    fn status_reports_request_and_api_codes() {
        let api: OpenRouterError = ApiError {
            code: 429,
            message: "slow down".into(),
            metadata: None,
        }
        .into();
        assert_eq!(api.status(), Some(429));

        let req: OpenRouterError = RequestError {
            status: 500,
            status_text: String::new(),
            body: Vec::new(),
            source: None,
        }
        .into();
        assert_eq!(req.status(), Some(500));

        assert_eq!(OpenRouterError::StreamNotSupported.status(), None);
    }

    #[test]
    fn stream_error_wraps_into_top_level() {
        let err: OpenRouterError = StreamError::Closed.into();
        assert!(matches!(err, OpenRouterError::Stream(StreamError::Closed)));
        assert_eq!(err.to_string(), "stream is closed");
    }
}
