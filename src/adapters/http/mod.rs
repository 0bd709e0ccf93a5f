//! HTTP adapter - the REST API.
//!
//! Each area has its own `dto` / `handlers` / `routes` triple. They share
//! [`AppState`] and the [`ApiError`] response mapping, and sit behind the
//! bearer-token [`middleware::auth_middleware`].
//!
//! | Prefix | Area |
//! |--------|------|
//! | `/api/me`, `/api/admin/stats`, `/api/admin/users` | accounts |
//! | `/api/payments`, `/api/admin/payments` | payments and review |
//! | `/api/teams` | teams |
//! | `/api/content`, `/api/library` | downloads |

pub mod account;
pub mod download;
mod error;
pub mod middleware;
pub mod payment;
mod state;
pub mod team;

use axum::{routing::get, Json, Router};

pub use error::{ApiError, ErrorResponse};
pub use middleware::AuthState;
pub use state::AppState;

/// GET /health - liveness check, no authentication.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the complete API router with authentication applied.
///
/// Transport layers (tracing, CORS, timeouts) are added by the binary.
pub fn api_router(state: AppState, validator: AuthState) -> Router {
    let api = Router::new()
        .nest("/me", account::me_routes())
        .nest("/payments", payment::payment_routes())
        .nest("/teams", team::team_routes())
        .nest("/content", download::content_routes())
        .nest("/library", download::library_routes())
        .nest(
            "/admin",
            account::admin_account_routes().nest("/payments", payment::admin_payment_routes()),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(axum::middleware::from_fn_with_state(
            validator,
            middleware::auth_middleware,
        ))
        .with_state(state)
}
