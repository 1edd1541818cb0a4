pub mod blogs;
pub mod feed;
pub mod github;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};

/// `{ "error": message }` with the given status; the envelope every endpoint uses.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}
