//! Axum router configuration for account endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    demote_admin, get_my_entitlement, get_stats, get_user_detail, list_users, promote_admin,
    reset_user_plan, update_user_plan,
};
use crate::adapters::http::state::AppState;

/// Caller routes, mounted at `/api/me`.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/entitlement", get(get_my_entitlement))
}

/// Admin routes, mounted at `/api/admin`.
///
/// - `GET /stats`
/// - `GET /users`
/// - `GET /users/:id`
/// - `PUT /users/:id/plan`
/// - `POST /users/:id/reset-plan`
/// - `POST /users/:id/promote`
/// - `POST /users/:id/demote`
pub fn admin_account_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user_detail))
        .route("/users/:id/plan", put(update_user_plan))
        .route("/users/:id/reset-plan", post(reset_user_plan))
        .route("/users/:id/promote", post(promote_admin))
        .route("/users/:id/demote", post(demote_admin))
}
