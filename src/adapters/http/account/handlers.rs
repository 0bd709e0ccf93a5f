//! HTTP handlers for account endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::account::{
    ChangeRoleCommand, GetEntitlementQuery, GetStatsQuery, GetUserDetailQuery, ListUsersQuery,
    ResetPlanCommand, UpdateUserPlanCommand,
};
use crate::domain::entitlement::{AccountError, AccountRole};
use crate::domain::foundation::{AuthenticatedUser, UserId};

use super::dto::{
    AccountResponse, UpdatePlanRequest, UserDetailResponse, UserListResponse,
    UserSummaryResponse,
};

fn parse_uid(raw: String) -> Result<UserId, AccountError> {
    Ok(UserId::new(raw)?)
}

/// GET /api/me/entitlement - The caller's plan and what it unlocks
pub async fn get_my_entitlement(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let view = state
        .get_entitlement_handler()
        .handle(GetEntitlementQuery {
            uid: account.id,
            now: state.now(),
        })
        .await?;

    Ok(Json(view))
}

/// GET /api/admin/stats - Dashboard counters
pub async fn get_stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&user).await?;

    let stats = state
        .stats_handler()
        .handle(GetStatsQuery { now: state.now() })
        .await?;

    Ok(Json(stats))
}

/// GET /api/admin/users - Every account with its team head-count
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&user).await?;

    let rows = state.list_users_handler().handle(ListUsersQuery).await?;

    Ok(Json(UserListResponse {
        users: rows.into_iter().map(UserSummaryResponse::from).collect(),
    }))
}

/// GET /api/admin/users/:id - Account, team and recent payments
pub async fn get_user_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&user).await?;
    let uid = parse_uid(uid)?;

    let detail = state
        .user_detail_handler()
        .handle(GetUserDetailQuery { uid })
        .await?;

    Ok(Json(UserDetailResponse::from(detail)))
}

/// PUT /api/admin/users/:id/plan - Manual plan override
pub async fn update_user_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(uid): Path<String>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state.require_admin(&user).await?;
    let uid = parse_uid(uid)?;

    let account = state
        .update_plan_handler()
        .handle(UpdateUserPlanCommand {
            uid,
            plan: request.plan,
            plan_expires_at: request.plan_expires_at,
            grace_until: request.grace_until,
            now: state.now(),
        })
        .await?;

    tracing::info!(admin = %admin.id, uid = %account.id, plan = %account.plan, "Plan overridden");
    Ok(Json(AccountResponse::from(account)))
}

/// POST /api/admin/users/:id/reset-plan - Back to FREE
pub async fn reset_user_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state.require_admin(&user).await?;
    let uid = parse_uid(uid)?;

    let account = state
        .reset_plan_handler()
        .handle(ResetPlanCommand {
            uid,
            now: state.now(),
        })
        .await?;

    tracing::info!(admin = %admin.id, uid = %account.id, "Plan reset");
    Ok(Json(AccountResponse::from(account)))
}

/// POST /api/admin/users/:id/promote
pub async fn promote_admin(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    change_role(&state, &user, uid, AccountRole::Admin).await
}

/// POST /api/admin/users/:id/demote
pub async fn demote_admin(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    change_role(&state, &user, uid, AccountRole::User).await
}

async fn change_role(
    state: &AppState,
    user: &AuthenticatedUser,
    target: String,
    role: AccountRole,
) -> Result<Json<AccountResponse>, ApiError> {
    let admin = state.require_admin(user).await?;
    let target_uid = parse_uid(target)?;

    let account = state
        .change_role_handler()
        .handle(ChangeRoleCommand {
            actor_uid: admin.id,
            target_uid,
            role,
            now: state.now(),
        })
        .await?;

    Ok(Json(AccountResponse::from(account)))
}
