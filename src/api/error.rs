//! Operational error type and the terminal error renderer
//!
//! Every failure a handler signals ends up here exactly once and becomes the
//! uniform JSON envelope `{"status": <label>, "message": <message>}`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// An operational error signaled by a handler.
///
/// Status code and label are optional at construction; the renderer fills in
/// 500 and "error" for whichever is missing.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status_code: Option<StatusCode>,
    pub status: Option<String>,
    pub message: String,
}

/// Wire shape of the error envelope
#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    status: &'a str,
    message: &'a str,
}

impl ApiError {
    /// Error with neither code nor label set (renders as 500 "error")
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            status: None,
            message: message.into(),
        }
    }

    /// Error with an explicit code and label
    pub fn with_status(code: StatusCode, label: &str, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(code),
            status: Some(label.to_string()),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, "fail", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, "fail", message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::METHOD_NOT_ALLOWED, "fail", message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::PAYLOAD_TOO_LARGE, "fail", message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Render an error as its HTTP response. This is the only place errors are
/// turned into wire bytes, and it cannot fail: missing fields get defaults
/// and the two-field envelope always serializes.
pub fn render(err: &ApiError) -> Response<Full<Bytes>> {
    let code = err.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let label = err.status.as_deref().unwrap_or("error");

    let envelope = ErrorEnvelope {
        status: label,
        message: &err.message,
    };
    let json = serde_json::to_string(&envelope).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize error envelope: {e}"));
        r#"{"status":"error","message":"internal server error"}"#.to_string()
    });

    Response::builder()
        .status(code)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build error response: {e}"));
            Response::new(Full::new(Bytes::from(
                r#"{"status":"error","message":"internal server error"}"#,
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("Full body cannot fail")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("error body must be valid JSON")
    }

    #[tokio::test]
    async fn test_defaults_applied() {
        let resp = render(&ApiError::new("not found"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "not found");
    }

    #[tokio::test]
    async fn test_explicit_fields_unchanged() {
        let err = ApiError::with_status(StatusCode::NOT_FOUND, "fail", "no such id");
        let resp = render(&err);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "no such id");
    }

    #[tokio::test]
    async fn test_default_label_with_explicit_code() {
        let err = ApiError {
            status_code: Some(StatusCode::BAD_GATEWAY),
            status: None,
            message: "upstream broke".to_string(),
        };
        let resp = render(&err);
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(resp).await["status"], "error");
    }

    #[tokio::test]
    async fn test_default_code_with_explicit_label() {
        let err = ApiError {
            status_code: None,
            status: Some("fail".to_string()),
            message: "oops".to_string(),
        };
        let resp = render(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["status"], "fail");
    }

    #[tokio::test]
    async fn test_independent_errors_share_nothing() {
        let a = ApiError::not_found("first");
        let b = ApiError::bad_request("second");
        let ra = render(&a);
        let rb = render(&b);
        assert_eq!(ra.status(), StatusCode::NOT_FOUND);
        assert_eq!(rb.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(ra).await["message"], "first");
        assert_eq!(body_json(rb).await["message"], "second");
    }

    #[test]
    fn test_content_type_is_json() {
        let resp = render(&ApiError::new("x"));
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }
}
