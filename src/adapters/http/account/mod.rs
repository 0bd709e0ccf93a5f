//! HTTP adapter for accounts: the caller's entitlement and admin account
//! management.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_account_routes, me_routes};
