//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands carry `now` explicitly; handlers never read the wall clock.

pub mod handlers;

pub use handlers::*;
