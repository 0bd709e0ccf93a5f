//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT and fixed-token session validators
//! - `clock` - system and fixed clocks
//! - `http` - axum REST API
//! - `memory` - in-memory repositories for tests and database-less runs
//! - `notification` - payer emails through Resend, or logs
//! - `postgres` - sqlx repositories and embedded migrations

pub mod auth;
pub mod clock;
pub mod http;
pub mod memory;
pub mod notification;
pub mod postgres;
