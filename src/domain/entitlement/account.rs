//! User account aggregate.
//!
//! Holds identity plus the entitlement snapshot. The FREE invariant (no
//! expiry, no grace) is enforced by every mutator here, so a FREE account
//! with dangling timestamps cannot be built through this type.

use serde::{Deserialize, Serialize};

use super::evaluator::EntitlementSnapshot;
use super::plan::{AccountRole, Plan};
use super::policy::EntitlementWindow;
use crate::domain::foundation::{TeamId, Timestamp, UserId, ValidationError};
use crate::domain::team::TeamRole;

/// A registered user and their current entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub role: AccountRole,
    pub plan: Plan,
    pub plan_expires_at: Option<Timestamp>,
    pub grace_until: Option<Timestamp>,
    pub team_id: Option<TeamId>,
    pub role_in_team: Option<TeamRole>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserAccount {
    /// Creates a FREE account with no team.
    pub fn register(id: UserId, email: &str, now: Timestamp) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            email: normalize_email(email)?,
            role: AccountRole::User,
            plan: Plan::Free,
            plan_expires_at: None,
            grace_until: None,
            team_id: None,
            role_in_team: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }

    /// Current entitlement fields as a snapshot for the evaluator.
    pub fn entitlement(&self) -> EntitlementSnapshot {
        EntitlementSnapshot {
            plan: self.plan,
            plan_expires_at: self.plan_expires_at,
            grace_until: self.grace_until,
        }
    }

    /// Sets a paid plan with a fresh window.
    pub fn grant(&mut self, plan: Plan, window: EntitlementWindow, now: Timestamp) {
        self.apply_entitlement(
            EntitlementSnapshot {
                plan,
                plan_expires_at: Some(window.expires_at),
                grace_until: Some(window.grace_until),
            },
            now,
        );
    }

    /// Writes an entitlement snapshot, clearing timestamps for FREE.
    pub fn apply_entitlement(&mut self, snapshot: EntitlementSnapshot, now: Timestamp) {
        self.plan = snapshot.plan;
        if snapshot.plan == Plan::Free {
            self.plan_expires_at = None;
            self.grace_until = None;
        } else {
            self.plan_expires_at = snapshot.plan_expires_at;
            self.grace_until = snapshot.grace_until;
        }
        self.updated_at = now;
    }

    pub fn join_team(&mut self, team_id: TeamId, role: TeamRole, now: Timestamp) {
        self.team_id = Some(team_id);
        self.role_in_team = Some(role);
        self.updated_at = now;
    }

    pub fn leave_team(&mut self, now: Timestamp) {
        self.team_id = None;
        self.role_in_team = None;
        self.updated_at = now;
    }

    pub fn set_role(&mut self, role: AccountRole, now: Timestamp) {
        self.role = role;
        self.updated_at = now;
    }
}

/// Trims and lower-cases an email, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ValidationError::invalid_format("email", "not an email address")),
    }
}
