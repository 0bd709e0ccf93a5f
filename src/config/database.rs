//! PostgreSQL settings

use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;

use super::error::ValidationError;

/// Connection pool for the sqlx adapters.
///
/// The whole section is optional; without it the service runs on the
/// in-memory adapters.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "DatabaseConfig::default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "DatabaseConfig::default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Apply the embedded migrations before serving
    #[serde(default = "DatabaseConfig::default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub const POOL_CEILING: u32 = 100;

    fn default_min_connections() -> u32 {
        1
    }

    fn default_max_connections() -> u32 {
        10
    }

    fn default_acquire_timeout_secs() -> u64 {
        10
    }

    fn default_run_migrations() -> bool {
        true
    }

    /// Pool builder carrying these limits.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::Missing("DATABASE__URL"));
        }
        if !["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return Err(ValidationError::invalid(
                "DATABASE__URL",
                "must be a postgres:// URL",
            ));
        }
        if self.max_connections == 0 || self.max_connections > Self::POOL_CEILING {
            return Err(ValidationError::invalid(
                "DATABASE__MAX_CONNECTIONS",
                "must be between 1 and 100",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::invalid(
                "DATABASE__MIN_CONNECTIONS",
                "cannot exceed max_connections",
            ));
        }
        Ok(())
    }
}
