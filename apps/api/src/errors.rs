use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Route-boundary error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": "<message>"}`. Upstream details are
/// logged here and never sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to search apartments")]
    SearchFailed,

    #[error("Failed to get recommendations")]
    RecommendationsFailed,

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::SearchFailed | AppError::RecommendationsFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::InvalidPayload(msg) => {
                tracing::debug!("Rejected request body: {msg}");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
