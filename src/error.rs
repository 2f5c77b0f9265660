//! HTTP-facing error type.
//!
//! Route handlers return `Result<T, AppError>`; each variant maps to a status
//! code and a JSON `{"error": ...}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cart::checkout::TransitionError;

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested catalog entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request from the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Checkout stage transition not allowed from the current stage.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Transition(_) => StatusCode::CONFLICT,
        };

        tracing::warn!(status = %status, error = %self, "Request rejected");

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
