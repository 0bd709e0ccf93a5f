//! Axum router configuration for download endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_library, record_download};
use crate::adapters::http::state::AppState;

/// Content routes, mounted at `/api/content`.
pub fn content_routes() -> Router<AppState> {
    Router::new().route("/:id/downloads/:resource_type", post(record_download))
}

/// Library routes, mounted at `/api/library`.
pub fn library_routes() -> Router<AppState> {
    Router::new().route("/", get(get_library))
}
