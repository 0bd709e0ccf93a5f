//! Account-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

/// Errors raised by account and entitlement operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// No account with this id.
    NotFound(UserId),

    /// Duplicate account or email.
    Conflict(String),

    /// Caller may not perform the operation.
    Forbidden(String),

    ValidationFailed { field: String, message: String },

    Infrastructure(String),
}

impl AccountError {
    pub fn not_found(user_id: UserId) -> Self {
        AccountError::NotFound(user_id)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AccountError::Conflict(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AccountError::Forbidden(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AccountError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        AccountError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccountError::NotFound(_) => ErrorCode::UserNotFound,
            AccountError::Conflict(_) => ErrorCode::Conflict,
            AccountError::Forbidden(_) => ErrorCode::Forbidden,
            AccountError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            AccountError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            AccountError::NotFound(id) => format!("User not found: {}", id),
            AccountError::Conflict(msg) => msg.clone(),
            AccountError::Forbidden(msg) => msg.clone(),
            AccountError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            AccountError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AccountError {}

impl From<ValidationError> for AccountError {
    fn from(err: ValidationError) -> Self {
        AccountError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Conflict => AccountError::Conflict(err.message),
            ErrorCode::Forbidden => AccountError::Forbidden(err.message),
            ErrorCode::ValidationFailed => AccountError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => AccountError::Infrastructure(err.to_string()),
        }
    }
}
