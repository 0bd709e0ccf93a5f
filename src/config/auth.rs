//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Bearer token settings (HS256 JWTs minted by the identity service).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret
    pub jwt_secret: SecretString,

    /// Expected `iss` claim; unchecked when absent
    #[serde(default)]
    pub issuer: Option<String>,

    /// Allowed clock skew in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub const MIN_SECRET_LEN: usize = 32;

    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::Missing("AUTH__JWT_SECRET"));
        }
        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(ValidationError::invalid(
                "AUTH__JWT_SECRET",
                "must be at least 32 bytes",
            ));
        }
        Ok(())
    }
}

fn default_leeway() -> u64 {
    30
}
