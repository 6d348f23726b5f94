//! API Error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use freshtrace_core::LedgerError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            ApiError::Ledger(e) => ledger_error_response(e),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Map distinct ledger conditions onto status codes so clients can tell
/// them apart
fn ledger_error_response(e: &LedgerError) -> (StatusCode, &'static str, String) {
    match e {
        LedgerError::RecordNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
        LedgerError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string()),
        LedgerError::WriteRejected(_) => (StatusCode::CONFLICT, "WRITE_REJECTED", e.to_string()),
        LedgerError::NetworkUnavailable(_) => {
            (StatusCode::BAD_GATEWAY, "LEDGER_UNAVAILABLE", e.to_string())
        }
        LedgerError::MalformedRecord(_) | LedgerError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_ERROR", e.to_string())
        }
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
