//! Runtime configuration.
//!
//! Everything comes from `KANTIK__`-prefixed environment variables (a `.env`
//! file is honoured in development). Nesting uses `__`, so
//! `KANTIK__ENTITLEMENT__GRACE_DAYS=5` sets `entitlement.grace_days`.
//!
//! ```no_run
//! let config = kantik::config::AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), kantik::config::ConfigError>(())
//! ```

mod auth;
mod database;
mod email;
mod entitlement;
mod error;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use entitlement::EntitlementConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Absent means in-memory storage.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    pub auth: AuthConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub entitlement: EntitlementConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal outside development.
        let _ = dotenvy::dotenv();

        let source = config::Environment::with_prefix("KANTIK")
            .prefix_separator("__")
            .separator("__");

        Ok(config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    /// Checks every section, stopping at the first bad key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.iter().try_for_each(DatabaseConfig::validate)?;
        self.auth.validate()?;
        self.email.validate()?;
        self.entitlement.validate()
    }
}
