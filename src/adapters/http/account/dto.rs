//! Data Transfer Objects for account endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::payment::dto::PaymentResponse;
use crate::application::handlers::account::{UserDetail, UserSummary};
use crate::application::handlers::team::TeamView;
use crate::domain::entitlement::{AccountRole, Plan, UserAccount};
use crate::domain::foundation::{TeamId, Timestamp, UserId};
use crate::domain::team::TeamRole;

/// Body of `PUT /api/admin/users/:id/plan`. Absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub plan_expires_at: Option<Timestamp>,
    #[serde(default)]
    pub grace_until: Option<Timestamp>,
}

/// Account as shown to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub uid: UserId,
    pub email: String,
    pub role: AccountRole,
    pub plan: Plan,
    pub plan_expires_at: Option<Timestamp>,
    pub grace_until: Option<Timestamp>,
    pub team_id: Option<TeamId>,
    pub role_in_team: Option<TeamRole>,
    pub updated_at: Timestamp,
}

impl From<UserAccount> for AccountResponse {
    fn from(a: UserAccount) -> Self {
        Self {
            uid: a.id,
            email: a.email,
            role: a.role,
            plan: a.plan,
            plan_expires_at: a.plan_expires_at,
            grace_until: a.grace_until,
            team_id: a.team_id,
            role_in_team: a.role_in_team,
            updated_at: a.updated_at,
        }
    }
}

/// Row of `GET /api/admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummaryResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub team_member_count: usize,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(s: UserSummary) -> Self {
        Self {
            account: s.account.into(),
            team_member_count: s.team_member_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummaryResponse>,
}

/// `GET /api/admin/users/:id`. `team` is null outside a team.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub team: Option<TeamView>,
    pub payments: Vec<PaymentResponse>,
}

impl From<UserDetail> for UserDetailResponse {
    fn from(d: UserDetail) -> Self {
        Self {
            account: d.account.into(),
            team: d.team,
            payments: d.payments.into_iter().map(PaymentResponse::from).collect(),
        }
    }
}
