//! Team-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | TeamNotFound / InvitationNotFound / UserNotFound / MemberNotFound | 404 |
//! | Forbidden | 403 |
//! | CapacityExceeded | 409 |
//! | Conflict | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    DomainError, ErrorCode, InvitationId, TeamId, UserId, ValidationError,
};

/// Errors raised by team operations and propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamError {
    TeamNotFound(TeamId),

    /// Invitation absent, expired, or already accepted.
    InvitationNotFound(InvitationId),

    UserNotFound(UserId),

    MemberNotFound { team_id: TeamId, uid: UserId },

    Forbidden(String),

    /// Team is full.
    CapacityExceeded { team_id: TeamId, max_members: u32 },

    /// Duplicate membership or team.
    Conflict(String),

    ValidationFailed { field: String, message: String },

    Infrastructure(String),
}

impl TeamError {
    pub fn team_not_found(id: TeamId) -> Self {
        TeamError::TeamNotFound(id)
    }

    pub fn invitation_not_found(id: InvitationId) -> Self {
        TeamError::InvitationNotFound(id)
    }

    pub fn user_not_found(uid: UserId) -> Self {
        TeamError::UserNotFound(uid)
    }

    pub fn member_not_found(team_id: TeamId, uid: UserId) -> Self {
        TeamError::MemberNotFound { team_id, uid }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        TeamError::Forbidden(message.into())
    }

    pub fn capacity_exceeded(team_id: TeamId, max_members: u32) -> Self {
        TeamError::CapacityExceeded {
            team_id,
            max_members,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        TeamError::Conflict(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TeamError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        TeamError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TeamError::TeamNotFound(_) => ErrorCode::TeamNotFound,
            TeamError::InvitationNotFound(_) => ErrorCode::InvitationNotFound,
            TeamError::UserNotFound(_) | TeamError::MemberNotFound { .. } => {
                ErrorCode::UserNotFound
            }
            TeamError::Forbidden(_) => ErrorCode::Forbidden,
            TeamError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            TeamError::Conflict(_) => ErrorCode::Conflict,
            TeamError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TeamError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            TeamError::TeamNotFound(id) => format!("Team not found: {}", id),
            TeamError::InvitationNotFound(id) => {
                format!("Invitation {} not found or expired", id)
            }
            TeamError::UserNotFound(uid) => format!("User not found: {}", uid),
            TeamError::MemberNotFound { team_id, uid } => {
                format!("User {} is not a member of team {}", uid, team_id)
            }
            TeamError::Forbidden(msg) => msg.clone(),
            TeamError::CapacityExceeded { max_members, .. } => {
                format!("Team is full (max {} members)", max_members)
            }
            TeamError::Conflict(msg) => msg.clone(),
            TeamError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            TeamError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for TeamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TeamError {}

impl From<ValidationError> for TeamError {
    fn from(err: ValidationError) -> Self {
        TeamError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for TeamError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Conflict => TeamError::Conflict(err.message),
            ErrorCode::Forbidden => TeamError::Forbidden(err.message),
            ErrorCode::ValidationFailed => TeamError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => TeamError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_exceeded_reports_cap() {
        let err = TeamError::capacity_exceeded(TeamId::new(), 7);
        assert_eq!(err.code(), ErrorCode::CapacityExceeded);
        assert!(err.message().contains('7'));
    }

    #[test]
    fn conflict_round_trips_through_domain_error() {
        let err: TeamError = DomainError::new(ErrorCode::Conflict, "already a member").into();
        assert_eq!(err, TeamError::conflict("already a member"));
    }

    #[test]
    fn unknown_domain_error_is_infrastructure() {
        let err: TeamError = DomainError::database("down").into();
        assert!(matches!(err, TeamError::Infrastructure(_)));
    }
}
