//! Payer notification settings.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Resend delivery settings. With no API key, notifications go to the log.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub resend_api_key: Option<SecretString>,
    pub from_email: String,
    pub from_name: String,
    /// Base for links in email bodies.
    pub app_base_url: String,
    pub support_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: "noreply@kantiktracks.com".into(),
            from_name: "Kantik Tracks".into(),
            app_base_url: "https://kantiktracks.com".into(),
            support_email: "support@kantiktracks.com".into(),
        }
    }
}

impl EmailConfig {
    /// `Name <address>` for the From header.
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let key_ok = self
            .resend_api_key
            .as_ref()
            .map_or(true, |key| key.expose_secret().starts_with("re_"));
        if !key_ok {
            return Err(ValidationError::invalid(
                "EMAIL__RESEND_API_KEY",
                "Resend keys start with re_",
            ));
        }

        for (key, address) in [
            ("EMAIL__FROM_EMAIL", &self.from_email),
            ("EMAIL__SUPPORT_EMAIL", &self.support_email),
        ] {
            if !address.contains('@') {
                return Err(ValidationError::invalid(key, "not an email address"));
            }
        }
        Ok(())
    }
}
