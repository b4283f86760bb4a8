// Request view handed to handlers

use hyper::body::Bytes;
use hyper::Method;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::error::ApiError;

/// The slice of an HTTP request a handler gets to see: method, path, named
/// path parameters captured by the router, and the raw body bytes.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: HashMap<String, String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: String, params: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            method,
            path,
            params,
            body,
        }
    }

    /// Look up a named path parameter captured by the router
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Deserialize the body as JSON. A malformed body is an ordinary
    /// operational error (400), not a crash.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
    }
}
