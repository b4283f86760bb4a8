// Built-in application handlers

use hyper::StatusCode;
use serde_json::json;

use super::error::ApiError;
use super::request::ApiRequest;
use super::response::JsonResponse;
use crate::routing::Router;

/// Sample user records served by `GET /api/users/:id`
const USERS: &[(&str, &str, &str)] = &[
    ("1", "alice", "alice@example.com"),
    ("2", "bob", "bob@example.com"),
    ("3", "carol", "carol@example.com"),
];

/// Build the application route table
pub fn build_router() -> Router {
    Router::new()
        .get("/healthz", health)
        .get("/api/hello", hello)
        .get("/api/users/:id", get_user)
        .post("/api/echo", echo)
}

async fn health(_req: ApiRequest) -> Result<JsonResponse, ApiError> {
    Ok(JsonResponse::ok(json!({"status": "ok"})))
}

async fn hello(_req: ApiRequest) -> Result<JsonResponse, ApiError> {
    Ok(JsonResponse::ok(json!({"message": "hello, world"})))
}

async fn get_user(req: ApiRequest) -> Result<JsonResponse, ApiError> {
    let id = req.param("id").unwrap_or_default();

    USERS
        .iter()
        .find(|(uid, _, _)| *uid == id)
        .map(|(uid, name, email)| {
            JsonResponse::ok(json!({
                "id": uid,
                "name": name,
                "email": email,
            }))
        })
        .ok_or_else(|| ApiError::with_status(StatusCode::NOT_FOUND, "fail", "no such id"))
}

async fn echo(req: ApiRequest) -> Result<JsonResponse, ApiError> {
    let value: serde_json::Value = req.json()?;
    Ok(JsonResponse::ok(json!({"echo": value})))
}
