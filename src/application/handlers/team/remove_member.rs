//! RemoveMemberHandler - Command handler for removing a team member.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementSnapshot;
use crate::domain::foundation::{DomainError, ErrorCode, TeamId, Timestamp, UserId};
use crate::domain::team::TeamError;
use crate::ports::{TeamRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct RemoveMemberCommand {
    pub team_id: TeamId,
    pub actor_uid: UserId,
    pub member_uid: UserId,
    pub now: Timestamp,
}

pub struct RemoveMemberHandler {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl RemoveMemberHandler {
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    /// Drops the membership and resets the removed user to FREE.
    pub async fn handle(&self, cmd: RemoveMemberCommand) -> Result<(), TeamError> {
        let team = self
            .teams
            .find_by_id(&cmd.team_id)
            .await?
            .ok_or_else(|| TeamError::team_not_found(cmd.team_id))?;

        let actor = self.teams.find_member(&team.id, &cmd.actor_uid).await?;
        if !actor.is_some_and(|m| m.role.can_manage_members()) {
            return Err(TeamError::forbidden("Only team owners and admins can remove members"));
        }
        if team.is_owner(&cmd.member_uid) {
            return Err(TeamError::forbidden("The team owner cannot be removed"));
        }

        if !self.teams.remove_member(&team.id, &cmd.member_uid).await? {
            return Err(TeamError::member_not_found(team.id, cmd.member_uid));
        }

        match self.reset_account(&cmd.member_uid, cmd.now).await {
            Ok(()) => {}
            Err(err) if err.code == ErrorCode::UserNotFound => {
                tracing::warn!(team_id = %team.id, uid = %cmd.member_uid, "Removed member has no account");
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            team_id = %team.id,
            uid = %cmd.member_uid,
            actor = %cmd.actor_uid,
            "Team member removed"
        );
        Ok(())
    }

    async fn reset_account(&self, uid: &UserId, now: Timestamp) -> Result<(), DomainError> {
        self.users
            .apply_entitlement(uid, &EntitlementSnapshot::free(), now)
            .await?;
        self.users.set_team(uid, None, now).await
    }
}
