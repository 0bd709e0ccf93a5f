//! Axum router configuration for team endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{accept_invitation, create_team, get_my_team, invite_member, remove_member};
use crate::adapters::http::state::AppState;

/// Team routes, mounted at `/api/teams`.
///
/// - `GET /mine`
/// - `POST /`
/// - `POST /:id/invitations`
/// - `POST /invitations/:id/accept`
/// - `DELETE /:id/members/:uid`
pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_team))
        .route("/mine", get(get_my_team))
        .route("/:id/invitations", post(invite_member))
        .route("/invitations/:id/accept", post(accept_invitation))
        .route("/:id/members/:uid", delete(remove_member))
}
