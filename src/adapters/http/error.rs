//! Error responses for the HTTP adapter.
//!
//! Every module error is folded into [`ApiError`], which carries the status
//! and the stable error code sent to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::download::DownloadError;
use crate::domain::entitlement::AccountError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::PaymentError;
use crate::domain::team::TeamError;

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts module errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let status = match &err {
            PaymentError::NotFound(_)
            | PaymentError::ReceiptNotFound(_)
            | PaymentError::PayerNotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::AlreadyReviewed { .. } => StatusCode::CONFLICT,
            PaymentError::Forbidden(_) => StatusCode::FORBIDDEN,
            PaymentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.code(), err.message())
    }
}

impl From<TeamError> for ApiError {
    fn from(err: TeamError) -> Self {
        let status = match &err {
            TeamError::TeamNotFound(_)
            | TeamError::InvitationNotFound(_)
            | TeamError::UserNotFound(_)
            | TeamError::MemberNotFound { .. } => StatusCode::NOT_FOUND,
            TeamError::Forbidden(_) => StatusCode::FORBIDDEN,
            TeamError::CapacityExceeded { .. } | TeamError::Conflict(_) => StatusCode::CONFLICT,
            TeamError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            TeamError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.code(), err.message())
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        let status = match &err {
            DownloadError::ContentNotFound(_)
            | DownloadError::ResourceNotFound { .. }
            | DownloadError::UserNotFound(_) => StatusCode::NOT_FOUND,
            DownloadError::Forbidden(_) => StatusCode::FORBIDDEN,
            DownloadError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            DownloadError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.code(), err.message())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let status = match &err {
            AccountError::NotFound(_) => StatusCode::NOT_FOUND,
            AccountError::Conflict(_) => StatusCode::CONFLICT,
            AccountError::Forbidden(_) => StatusCode::FORBIDDEN,
            AccountError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            AccountError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.code(), err.message())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.code, err.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(code = %self.code, error = %self.message, "Request failed");
            "Internal server error".to_string()
        } else {
            self.message
        };

        let body = ErrorResponse::new(self.code.to_string(), message);
        (self.status, Json(body)).into_response()
    }
}
