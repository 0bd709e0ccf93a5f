//! Authentication adapters implementing `SessionValidator`.
//!
//! - `jwt` - HS256 tokens from the identity service
//! - `mock` - fixed token table for tests and local runs

mod jwt;
mod mock;

pub use jwt::{AccessClaims, JwtSessionValidator};
pub use mock::MockSessionValidator;
