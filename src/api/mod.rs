//! JSON API module entry
//!
//! Per-request pipeline: access logging, body-size precheck, OPTIONS
//! handling, route lookup, handler execution, and error rendering. Every
//! failure path funnels through the error renderer so the wire only ever
//! carries one error shape.

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;

pub use error::ApiError;
pub use request::ApiRequest;
pub use response::JsonResponse;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body as _, Bytes, Incoming};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use crate::routing::RouteLookup;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);
    let mut entry = if access_log {
        let mut entry =
            AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path.clone());
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = http_version_str(req.version()).to_string();
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        Some(entry)
    } else {
        None
    };

    let response = dispatch(req, &state, &method, &path).await;

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .unwrap_or(0)
            .try_into()
            .unwrap_or(usize::MAX);
        entry.request_time_us = started.elapsed().as_micros().try_into().unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route the request and produce a response. Infallible by construction:
/// every error becomes an envelope.
async fn dispatch(
    req: Request<Incoming>,
    state: &Arc<AppState>,
    method: &Method,
    path: &str,
) -> Response<Full<Bytes>> {
    if *method == Method::OPTIONS {
        return response::build_options_response(state.config.http.enable_cors);
    }

    if let Some(err) = check_body_size(&req, state.config.http.max_body_size) {
        return error::render(&err);
    }

    match state.router.find(method, path) {
        RouteLookup::Found { handler, params } => {
            let body = match req.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    logger::log_error(&format!("Failed to read request body: {e}"));
                    return error::render(&ApiError::bad_request("Failed to read request body"));
                }
            };

            let api_req = ApiRequest::new(method.clone(), path.to_string(), params, body);
            match handler(api_req).await {
                Ok(resp) => resp.into_http(),
                Err(err) => error::render(&err),
            }
        }
        RouteLookup::MethodNotAllowed { allowed } => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            let err = ApiError::method_not_allowed(format!("{method} is not allowed for {path}"));
            let mut resp = error::render(&err);
            let allow = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = allow.parse() {
                resp.headers_mut().insert("Allow", value);
            }
            resp
        }
        RouteLookup::NotFound => {
            error::render(&ApiError::not_found(format!("No route for {method} {path}")))
        }
    }
}

/// Validate Content-Length against the configured limit
fn check_body_size(req: &Request<Incoming>, max_body_size: u64) -> Option<ApiError> {
    let content_length = req.headers().get("content-length")?;
    let size_str = match content_length.to_str() {
        Ok(s) => s,
        Err(_) => {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            return None;
        }
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(ApiError::payload_too_large(format!(
                "Request body exceeds {max_body_size} bytes"
            )))
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

fn http_version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
