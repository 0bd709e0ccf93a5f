//! Configuration error types

use thiserror::Error;

/// Loading or validating `AppConfig` failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read KANTIK__* settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A setting that was read but cannot be used.
///
/// `key` is the variable name below the `KANTIK__` prefix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key}: {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub fn invalid(key: &'static str, reason: &'static str) -> Self {
        ValidationError::Invalid { key, reason }
    }

    /// Variable name of the offending setting.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::Missing(key) | ValidationError::Invalid { key, .. } => key,
        }
    }
}
