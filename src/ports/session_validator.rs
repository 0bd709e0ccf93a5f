//! Bearer token verification.
//!
//! Kantik never issues or refreshes tokens. Implementations map a bad
//! signature or malformed token to `AuthError::InvalidToken`, a stale one to
//! `AuthError::TokenExpired`, and provider outages to
//! `AuthError::ServiceUnavailable`.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` is the raw value after `Bearer `.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
