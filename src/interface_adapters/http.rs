// Shared HTTP response types for consistent API error payloads.

use axum::{Json, http::StatusCode};

use crate::domain::LedgerError;

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    // Human-readable error string for consistent JSON error responses.
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub fn map_ledger_error(err: LedgerError) -> ApiError {
    let status = match err {
        LedgerError::NotInitialized | LedgerError::UnknownUpgrade => StatusCode::NOT_FOUND,
        LedgerError::InsufficientResources | LedgerError::EmptyDeposit => StatusCode::BAD_REQUEST,
        LedgerError::AlreadyPurchased => StatusCode::CONFLICT,
        LedgerError::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.message())
}
