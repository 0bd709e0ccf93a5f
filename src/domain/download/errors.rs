//! Download error types.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ContentNotFound / ResourceNotFound / UserNotFound | 404 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{ContentId, DomainError, ErrorCode, UserId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    ContentNotFound(ContentId),

    ResourceNotFound {
        content_id: ContentId,
        resource_type: String,
    },

    UserNotFound(UserId),

    /// The caller's plan does not cover this content.
    Forbidden(String),

    ValidationFailed { field: String, message: String },

    Infrastructure(String),
}

impl DownloadError {
    pub fn content_not_found(id: ContentId) -> Self {
        DownloadError::ContentNotFound(id)
    }

    pub fn resource_not_found(content_id: ContentId, resource_type: impl Into<String>) -> Self {
        DownloadError::ResourceNotFound {
            content_id,
            resource_type: resource_type.into(),
        }
    }

    pub fn user_not_found(uid: UserId) -> Self {
        DownloadError::UserNotFound(uid)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DownloadError::Forbidden(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DownloadError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DownloadError::ContentNotFound(_) => ErrorCode::ContentNotFound,
            DownloadError::ResourceNotFound { .. } => ErrorCode::ResourceNotFound,
            DownloadError::UserNotFound(_) => ErrorCode::UserNotFound,
            DownloadError::Forbidden(_) => ErrorCode::Forbidden,
            DownloadError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DownloadError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DownloadError::ContentNotFound(id) => format!("Content not found: {}", id),
            DownloadError::ResourceNotFound {
                content_id,
                resource_type,
            } => format!("Resource '{}' not found for {}", resource_type, content_id),
            DownloadError::UserNotFound(uid) => format!("User not found: {}", uid),
            DownloadError::Forbidden(msg) => msg.clone(),
            DownloadError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            DownloadError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DownloadError {}

impl From<ValidationError> for DownloadError {
    fn from(err: ValidationError) -> Self {
        DownloadError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for DownloadError {
    fn from(err: DomainError) -> Self {
        DownloadError::Infrastructure(err.to_string())
    }
}
