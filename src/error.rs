//! Error handling

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::logic::validation::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

/// Generic message for every 400. Field names and values stay in the log.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input data";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("request body exceeds size limit")]
    PayloadTooLarge,

    #[error("unexpected fault: {0}")]
    UnexpectedFault(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(detail) => {
                tracing::warn!("Rejected payload: {}", detail);
                (StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE)
            }
            AppError::PayloadTooLarge => {
                tracing::warn!("Rejected payload: body exceeds size limit");
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
            }
            AppError::UnexpectedFault(msg) => {
                tracing::error!("Unexpected fault: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// `CatchPanicLayer` hook: a panicking handler becomes a generic 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::UnexpectedFault(detail).into_response()
}
