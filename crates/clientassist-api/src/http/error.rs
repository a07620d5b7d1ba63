//! Application error type mapping to HTTP responses.

use axum::response::{IntoResponse, Response};

use clientassist_infra::slack::payload::PayloadError;

use crate::http::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed into an event.
    InvalidPayload(String),
}

impl From<PayloadError> for AppError {
    fn from(e: PayloadError) -> Self {
        AppError::InvalidPayload(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::InvalidPayload(msg) => ("INVALID_PAYLOAD", msg.as_str()),
        };
        tracing::warn!(code, error = message, "request failed");

        ApiResponse::error(code, message, uuid::Uuid::now_v7().to_string()).into_response()
    }
}
