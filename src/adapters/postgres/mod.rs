//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - accounts and entitlement writes
//! - `PostgresPaymentRepository` - payment proofs with a conditional review update
//! - `PostgresTeamRepository` - teams, members and invitations
//! - `PostgresContentRepository` - content catalog reads and download accounting
//!
//! Queries are built at runtime with `sqlx::query` so the crate compiles
//! without a live database. Schema lives in `migrations/`.

mod content;
mod payments;
mod teams;
mod users;

use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

pub use content::PostgresContentRepository;
pub use payments::PostgresPaymentRepository;
pub use teams::PostgresTeamRepository;
pub use users::PostgresUserRepository;

/// Embedded migrations, applied at startup when enabled.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

fn db_error(action: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, err))
}

/// Parses a stored enum column, reporting bad values as database errors.
fn parse_column<T>(value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    value
        .parse()
        .map_err(|e: ValidationError| DomainError::database(format!("Invalid column value: {}", e)))
}

fn parse_user_id(value: String) -> Result<UserId, DomainError> {
    UserId::new(value).map_err(|e| DomainError::database(format!("Invalid user id: {}", e)))
}
