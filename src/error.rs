//! Error types for the REST API.

use crate::market::KlineError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;


/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Chain is not configured.
    #[error("Chain not found: {0}")]
    ChainNotFound(u64),

    /// Upstream market data timed out or is temporarily unavailable.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::ChainNotFound(_) => (StatusCode::NOT_FOUND, "CHAIN_NOT_FOUND"),
            ApiError::UpstreamUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_TIMEOUT")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<KlineError> for ApiError {
    fn from(err: KlineError) -> Self {
        match err {
            KlineError::Timeout(e) => ApiError::UpstreamUnavailable(e.to_string()),
            KlineError::Upstream(e) => ApiError::Internal(e.to_string()),
        }
    }
}
