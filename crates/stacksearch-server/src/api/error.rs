//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::{error, warn};

/// Errors a handler can return; each renders as `{"error": "..."}`
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request is missing or has malformed parameters
    #[error("{0}")]
    BadRequest(String),
    /// The search task failed
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(message) => warn!(status = status.as_u16(), "Rejected request: {}", message),
            ApiError::Internal(message) => error!(status = status.as_u16(), "Request failed: {}", message),
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
