//! User account repository port.
//!
//! There is no whole-row update. Each write touches only its own columns:
//!
//! - `apply_entitlement`: plan, expiry, grace
//! - `copy_entitlement`: plan, expiry, grace, read from another account
//! - `set_role`: platform role
//! - `set_team`: team id and role in team
//!
//! A review approval and an admin role change on the same account can
//! therefore commit in any order without one undoing the other. Team
//! propagation relies on `apply_entitlement` being a single-row write so
//! members can be updated independently.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entitlement::{AccountRole, EntitlementSnapshot, UserAccount};
use crate::domain::foundation::{DomainError, TeamId, Timestamp, UserId};
use crate::domain::team::TeamRole;

/// Plan head-counts used by the admin dashboard.
///
/// "Active" counts include accounts in their grace period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub total_users: u64,
    pub standard_users: u64,
    pub team_users: u64,
    pub active_standard: u64,
    pub active_team: u64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the id or email is already registered
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, account: &UserAccount) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Lookup by normalized (lower-case) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError>;

    /// Every account, oldest first.
    async fn list(&self) -> Result<Vec<UserAccount>, DomainError>;

    /// Write the platform role only.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account doesn't exist
    async fn set_role(
        &self,
        id: &UserId,
        role: AccountRole,
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Write team id and role in team only; `None` clears both.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account doesn't exist
    async fn set_team(
        &self,
        id: &UserId,
        team: Option<(TeamId, TeamRole)>,
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Atomically write plan, expiry and grace on one account.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account doesn't exist
    async fn apply_entitlement(
        &self,
        id: &UserId,
        snapshot: &EntitlementSnapshot,
        now: Timestamp,
    ) -> Result<(), DomainError>;

    /// Give `to` the plan, expiry and grace currently stored on `from`.
    ///
    /// The read of `from` and the write of `to` are one statement, so a
    /// renewal of `from` committed before the call is always copied, and a
    /// later one reaches `to` through propagation.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if either account doesn't exist
    async fn copy_entitlement(
        &self,
        from: &UserId,
        to: &UserId,
        now: Timestamp,
    ) -> Result<(), DomainError>;

    async fn plan_stats(&self, now: Timestamp) -> Result<PlanStats, DomainError>;
}
