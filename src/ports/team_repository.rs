//! Team and invitation repository ports.
//!
//! Capacity and the one-team-per-account rule are enforced by `add_member`
//! itself (conditional insert), not by a read-then-write in the caller, so
//! concurrent accepts cannot overfill a team or seat one user twice.
//!
//! Membership rows are the source of truth for who is in a team. The copy
//! on the account (`team_id`, `role_in_team`) is written afterwards through
//! `UserRepository::set_team`, which leaves entitlement columns alone.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InvitationId, TeamId, UserId};
use crate::domain::team::{Team, TeamInvitation, TeamMembership};

/// Result of a capacity-checked membership insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMemberOutcome {
    Added,
    CapacityExceeded,
    /// The user already holds a seat, in this team or another one.
    AlreadyInTeam,
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Persist a team together with its OWNER membership.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the owner already owns or belongs to a team
    async fn create(&self, team: &Team, owner: &TeamMembership) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// All memberships of the team, oldest first.
    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMembership>, DomainError>;

    async fn find_member(
        &self,
        team_id: &TeamId,
        uid: &UserId,
    ) -> Result<Option<TeamMembership>, DomainError>;

    /// Insert a membership only if the team has fewer than `max_members`
    /// and the user has no seat anywhere.
    async fn add_member(
        &self,
        membership: &TeamMembership,
        max_members: u32,
    ) -> Result<AddMemberOutcome, DomainError>;

    /// Returns `false` if there was no such membership.
    async fn remove_member(&self, team_id: &TeamId, uid: &UserId) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn insert(&self, invitation: &TeamInvitation) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<TeamInvitation>, DomainError>;

    /// Flip PENDING to ACCEPTED. Returns `false` if it was not PENDING.
    async fn mark_accepted(&self, id: &InvitationId) -> Result<bool, DomainError>;
}
