//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use streamgate_core::{ContentIdError, GatewayError};

/// Errors returned by addon handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {reason}")]
    BadRequest { reason: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl From<ContentIdError> for ApiError {
    fn from(e: ContentIdError) -> Self {
        ApiError::BadRequest {
            reason: e.to_string(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        if e.is_user_error() {
            ApiError::BadRequest {
                reason: e.to_string(),
            }
        } else {
            ApiError::Internal {
                reason: e.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { reason } => {
                tracing::error!(reason = %reason, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
