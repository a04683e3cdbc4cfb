//! Internal error helpers for mapping HTTP/reqwest failures to [`OpenRouterError`].

use openrouter_types::{ErrorResponse, OpenRouterError, RequestError};
use reqwest::StatusCode;

/// Map a [`reqwest::Error`] raised while sending or reading a body.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> OpenRouterError {
    OpenRouterError::Transport(Box::new(err))
}

/// Consume a non-success response and turn it into an error.
///
/// The body is read in full; if it cannot be read at all the transport
/// error is returned instead.
pub(crate) async fn error_from_response(response: reqwest::Response) -> OpenRouterError {
    let status = response.status();
    match response.bytes().await {
        Ok(body) => error_from_body(status, &body),
        Err(e) => map_reqwest_error(e),
    }
}

/// Interpret an error body: the `{"error": {...}}` envelope becomes
/// [`OpenRouterError::Api`], anything else a [`RequestError`] carrying the
/// raw status and body.
pub(crate) fn error_from_body(status: StatusCode, body: &[u8]) -> OpenRouterError {
    let parsed = serde_json::from_slice::<ErrorResponse>(body);
    tracing::warn!(status = status.as_u16(), body_len = body.len(), "request failed");
    match parsed {
        Ok(ErrorResponse { error: Some(api) }) => OpenRouterError::Api(api),
        Ok(ErrorResponse { error: None }) => request_error(status, body, None),
        Err(e) => request_error(status, body, Some(e)),
    }
}

fn request_error(
    status: StatusCode,
    body: &[u8],
    source: Option<serde_json::Error>,
) -> OpenRouterError {
    OpenRouterError::Request(RequestError {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body: body.to_vec(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_becomes_api_error() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            br#"{"error":{"code":400,"message":"Invalid model","metadata":{"provider_name":"OpenAI"}}}"#,
        );
        let OpenRouterError::Api(api) = err else {
            panic!("expected Api");
        };
        assert_eq!(api.code, 400);
        assert_eq!(api.message, "Invalid model");
        assert_eq!(
            api.metadata.unwrap()["provider_name"],
            serde_json::json!("OpenAI")
        );
    }

    #[test]
    fn envelope_without_code_keeps_message() {
        let err = error_from_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error":{"message":"Internal server error"}}"#,
        );
        assert!(matches!(&err, OpenRouterError::Api(api) if api.code == 0));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn non_json_body_becomes_request_error() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        let OpenRouterError::Request(req) = &err else {
            panic!("expected Request, got {err:?}");
        };
        assert_eq!(req.status, 502);
        assert_eq!(req.status_text, "Bad Gateway");
        assert_eq!(req.body, b"<html>bad gateway</html>");
        assert!(req.source.is_some());
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("<html>bad gateway</html>"));
    }

    #[test]
    fn json_without_error_field_becomes_request_error() {
        let err = error_from_body(StatusCode::NOT_FOUND, br#"{"detail":"nope"}"#);
        let OpenRouterError::Request(req) = err else {
            panic!("expected Request");
        };
        assert_eq!(req.status, 404);
        assert!(req.source.is_none());
    }

    #[test]
    fn empty_body_becomes_request_error() {
        let err = error_from_body(StatusCode::SERVICE_UNAVAILABLE, b"");
        assert!(matches!(
            err,
            OpenRouterError::Request(ref r) if r.status == 503 && r.body.is_empty()
        ));
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = error_from_body(status, b"?");
        assert!(matches!(err, OpenRouterError::Request(ref r) if r.status_text.is_empty()));
    }
}
