// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;
use crate::services::ResponderError;

pub type AppResult<T> = Result<T, AppError>;

/// Handler errors. Every variant renders as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream responder failed: {0}")]
    Upstream(#[from] ResponderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "responder call failed");
                (StatusCode::BAD_GATEWAY, "Upstream responder failed".to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
