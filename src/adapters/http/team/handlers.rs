//! HTTP handlers for team endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::team::{
    AcceptInvitationCommand, CreateTeamCommand, GetMyTeamQuery, InviteMemberCommand,
    RemoveMemberCommand,
};
use crate::domain::foundation::{InvitationId, TeamId, UserId};
use crate::domain::team::TeamError;

use super::dto::{CreateTeamRequest, InvitationResponse, InviteMemberRequest, MyTeamResponse};

/// GET /api/teams/mine - The caller's team and its members
pub async fn get_my_team(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let team = state
        .get_my_team_handler()
        .handle(GetMyTeamQuery { uid: account.id })
        .await?;

    Ok(Json(MyTeamResponse { team }))
}

/// POST /api/teams - Create a team owned by the caller
pub async fn create_team(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let team = state
        .create_team_handler()
        .handle(CreateTeamCommand {
            uid: account.id,
            name: request.name,
            now: state.now(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// POST /api/teams/:id/invitations - Invite an email into the team
pub async fn invite_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(team_id): Path<Uuid>,
    Json(request): Json<InviteMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let invitation = state
        .invite_member_handler()
        .handle(InviteMemberCommand {
            team_id: TeamId::from_uuid(team_id),
            inviter_uid: account.id,
            email: request.email,
            role: request.role,
            now: state.now(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(InvitationResponse { invitation })))
}

/// POST /api/teams/invitations/:id/accept - Join the inviting team
pub async fn accept_invitation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let membership = state
        .accept_invitation_handler()
        .handle(AcceptInvitationCommand {
            invitation_id: InvitationId::from_uuid(invitation_id),
            uid: account.id,
            now: state.now(),
        })
        .await?;

    Ok(Json(membership))
}

/// DELETE /api/teams/:id/members/:uid - Remove a member
pub async fn remove_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((team_id, member_uid)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;
    let member_uid = UserId::new(member_uid).map_err(TeamError::from)?;

    state
        .remove_member_handler()
        .handle(RemoveMemberCommand {
            team_id: TeamId::from_uuid(team_id),
            actor_uid: account.id,
            member_uid,
            now: state.now(),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
