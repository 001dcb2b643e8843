use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// A custom error type for the server application.
///
/// Translation failures are not errors at this layer: they degrade to a `null`
/// filter. What remains is input the server refuses to process.
#[derive(Debug)]
pub enum AppError {
    /// The request was well-formed JSON but is not acceptable.
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => {
                warn!("Rejected request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
