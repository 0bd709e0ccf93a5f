//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | ReceiptNotFound | 404 |
//! | PayerNotFound | 404 |
//! | AlreadyReviewed | 409 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use super::status::PaymentStatus;
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, UserId, ValidationError};

/// Errors raised by payment submission and review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// No payment with this id (or not owned by the caller).
    NotFound(PaymentId),

    /// Payment has no receipt attached.
    ReceiptNotFound(PaymentId),

    /// The payer's account no longer exists.
    PayerNotFound(UserId),

    /// Payment already left PENDING.
    AlreadyReviewed {
        payment_id: PaymentId,
        status: PaymentStatus,
    },

    Forbidden(String),

    ValidationFailed {
        field: String,
        message: String,
    },

    Infrastructure(String),
}

impl PaymentError {
    pub fn not_found(id: PaymentId) -> Self {
        PaymentError::NotFound(id)
    }

    pub fn receipt_not_found(id: PaymentId) -> Self {
        PaymentError::ReceiptNotFound(id)
    }

    pub fn payer_not_found(uid: UserId) -> Self {
        PaymentError::PayerNotFound(uid)
    }

    pub fn already_reviewed(payment_id: PaymentId, status: PaymentStatus) -> Self {
        PaymentError::AlreadyReviewed { payment_id, status }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        PaymentError::Forbidden(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::NotFound(_) => ErrorCode::PaymentNotFound,
            PaymentError::ReceiptNotFound(_) => ErrorCode::ReceiptNotFound,
            PaymentError::PayerNotFound(_) => ErrorCode::UserNotFound,
            PaymentError::AlreadyReviewed { .. } => ErrorCode::AlreadyReviewed,
            PaymentError::Forbidden(_) => ErrorCode::Forbidden,
            PaymentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PaymentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            PaymentError::NotFound(id) => format!("Payment not found: {}", id),
            PaymentError::ReceiptNotFound(id) => format!("No receipt uploaded for payment {}", id),
            PaymentError::PayerNotFound(uid) => format!("Payer not found: {}", uid),
            PaymentError::AlreadyReviewed { payment_id, status } => {
                format!("Payment {} has already been reviewed ({})", payment_id, status)
            }
            PaymentError::Forbidden(msg) => msg.clone(),
            PaymentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PaymentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PaymentError {}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => PaymentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Forbidden => PaymentError::Forbidden(err.message),
            _ => PaymentError::Infrastructure(err.to_string()),
        }
    }
}
