//! Caller identity as seen by the core.
//!
//! Token checking lives behind `SessionValidator`. Plan and expiry are never
//! taken from claims; handlers load the stored account for those.

use thiserror::Error;

use super::UserId;

/// The subject of a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    /// Claimed admin role. Review endpoints still confirm it against storage.
    pub is_admin: bool,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id,
            email: email.into(),
            is_admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("bearer token is missing or not valid")]
    InvalidToken,

    #[error("bearer token has expired")]
    TokenExpired,

    #[error("token subject has no account")]
    UserNotFound,

    #[error("identity provider unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_claim_is_carried_through() {
        let user = AuthenticatedUser::new(UserId::new("root").unwrap(), "root@kantik.ht", true);
        assert_eq!(user.id.as_str(), "root");
        assert!(user.is_admin);
    }

    #[test]
    fn outage_reason_is_kept_in_message() {
        let err = AuthError::service_unavailable("jwks fetch timed out");
        assert_eq!(err.to_string(), "identity provider unavailable: jwks fetch timed out");
    }
}
