//! GetEntitlementHandler - the caller's plan as the evaluator sees it.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::entitlement::{
    downloadable_tiers, is_in_grace_period, is_plan_active, AccessTier, AccountError, AccountRole,
    Plan,
};
use crate::domain::foundation::{TeamId, Timestamp, UserId};
use crate::domain::team::TeamRole;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct GetEntitlementQuery {
    pub uid: UserId,
    pub now: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitlementView {
    pub uid: UserId,
    pub email: String,
    pub role: AccountRole,
    pub plan: Plan,
    pub plan_expires_at: Option<Timestamp>,
    pub grace_until: Option<Timestamp>,
    pub is_active: bool,
    pub in_grace_period: bool,
    pub downloadable_tiers: Vec<AccessTier>,
    pub team_id: Option<TeamId>,
    pub role_in_team: Option<TeamRole>,
}

pub struct GetEntitlementHandler {
    users: Arc<dyn UserRepository>,
}

impl GetEntitlementHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetEntitlementQuery) -> Result<EntitlementView, AccountError> {
        let account = self
            .users
            .find_by_id(&query.uid)
            .await?
            .ok_or_else(|| AccountError::not_found(query.uid.clone()))?;
        let snapshot = account.entitlement();

        Ok(EntitlementView {
            is_active: is_plan_active(&snapshot, query.now),
            in_grace_period: is_in_grace_period(&snapshot, query.now),
            downloadable_tiers: downloadable_tiers(&snapshot, query.now),
            uid: account.id,
            email: account.email,
            role: account.role,
            plan: account.plan,
            plan_expires_at: account.plan_expires_at,
            grace_until: account.grace_until,
            team_id: account.team_id,
            role_in_team: account.role_in_team,
        })
    }
}
