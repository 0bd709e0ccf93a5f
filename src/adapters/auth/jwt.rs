//! HS256 bearer token validation.
//!
//! Tokens are minted by the identity service with a shared secret. The
//! claims carry the subject, email and an admin hint; entitlement is never
//! read from the token.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Claims expected in a Kantik access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

pub struct JwtSessionValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString, issuer: Option<&str>, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Token issuer mismatch");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!(error = %e, "Token rejected");
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = data.claims;

        let id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!(sub = %claims.sub, "Token subject is not a valid user id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(id, claims.email, claims.is_admin))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "kantik-test-secret-kantik-test-secret";

    fn secret() -> SecretString {
        SecretString::new(SECRET.to_string())
    }

    fn token(claims: &AccessClaims, key: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset_secs: i64) -> AccessClaims {
        AccessClaims {
            sub: "user-42".to_string(),
            email: "rose@kantik.ht".to_string(),
            is_admin: true,
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
            iss: Some("kantik-auth".to_string()),
        }
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let validator = JwtSessionValidator::new(&secret(), Some("kantik-auth"), 0);

        let user = validator.validate(&token(&claims(600), SECRET)).await.unwrap();

        assert_eq!(user.id.as_str(), "user-42");
        assert_eq!(user.email, "rose@kantik.ht");
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);

        let err = validator.validate(&token(&claims(-600), SECRET)).await.unwrap_err();

        assert_eq!(err, AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);

        let err = validator
            .validate(&token(&claims(600), "another-secret-another-secret-xx"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn wrong_issuer_is_invalid() {
        let validator = JwtSessionValidator::new(&secret(), Some("someone-else"), 0);

        let err = validator.validate(&token(&claims(600), SECRET)).await.unwrap_err();

        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);

        assert_eq!(
            validator.validate("not.a.jwt").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
