// API response utility functions module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// A successful handler result: a status code and a structured JSON body
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl JsonResponse {
    /// 200 OK with the given body
    pub const fn ok(body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub const fn with_status(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Serialize into the wire response
    pub fn into_http(self) -> Response<Full<Bytes>> {
        let json = serde_json::to_string(&self.body).unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to serialize response body: {e}"));
            r#"{"status":"error","message":"internal server error"}"#.to_string()
        });

        Response::builder()
            .status(self.status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(json)))
            .unwrap_or_else(|e| {
                logger::log_error(&format!("Failed to build response: {e}"));
                Response::new(Full::new(Bytes::from("{}")))
            })
    }
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, POST, PUT, DELETE, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header(
                "Access-Control-Allow-Methods",
                "GET, POST, PUT, DELETE, OPTIONS",
            )
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build OPTIONS response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}
