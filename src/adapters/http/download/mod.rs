//! HTTP adapter for downloads and the caller's library.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{content_routes, library_routes};
