//! Token table validator for tests and local development.
//!
//! # Example
//!
//! ```ignore
//! use kantik::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new().with_test_user("token-ana", "ana");
//! let user = validator.validate("token-ana").await?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Maps fixed tokens to users. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Registers `<uid>@kantik.test` as a non-admin user. Invalid ids are
    /// ignored.
    pub fn with_test_user(self, token: impl Into<String>, uid: &str) -> Self {
        match UserId::new(uid) {
            Ok(id) => self.with_user(
                token,
                AuthenticatedUser::new(id, format!("{uid}@kantik.test"), false),
            ),
            Err(_) => self,
        }
    }

    /// Every validation fails with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_token_returns_user() {
        let validator = MockSessionValidator::new().with_test_user("t-1", "ana");

        let user = validator.validate("t-1").await.unwrap();

        assert_eq!(user.id.as_str(), "ana");
        assert_eq!(user.email, "ana@kantik.test");
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        assert_eq!(
            MockSessionValidator::new().validate("nope").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_test_user("t-1", "ana")
            .with_error(AuthError::service_unavailable("down"));

        assert!(matches!(
            validator.validate("t-1").await,
            Err(AuthError::ServiceUnavailable(_))
        ));
    }
}
