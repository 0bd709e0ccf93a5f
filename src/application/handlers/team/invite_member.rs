//! InviteMemberHandler - Command handler for team invitations.

use std::sync::Arc;

use crate::domain::entitlement::normalize_email;
use crate::domain::foundation::{TeamId, Timestamp, UserId};
use crate::domain::team::{TeamError, TeamInvitation, TeamRole};
use crate::ports::{InvitationRepository, TeamRepository};

#[derive(Debug, Clone)]
pub struct InviteMemberCommand {
    pub team_id: TeamId,
    pub inviter_uid: UserId,
    pub email: String,
    pub role: TeamRole,
    pub now: Timestamp,
}

pub struct InviteMemberHandler {
    teams: Arc<dyn TeamRepository>,
    invitations: Arc<dyn InvitationRepository>,
    ttl_days: i64,
}

impl InviteMemberHandler {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        invitations: Arc<dyn InvitationRepository>,
        ttl_days: i64,
    ) -> Self {
        Self {
            teams,
            invitations,
            ttl_days,
        }
    }

    /// Issues a PENDING invitation for `email`.
    ///
    /// Capacity is checked here as a courtesy; the binding check happens
    /// again when the invitation is accepted.
    pub async fn handle(&self, cmd: InviteMemberCommand) -> Result<TeamInvitation, TeamError> {
        let team = self
            .teams
            .find_by_id(&cmd.team_id)
            .await?
            .ok_or_else(|| TeamError::team_not_found(cmd.team_id))?;

        let inviter = self.teams.find_member(&team.id, &cmd.inviter_uid).await?;
        if !inviter.is_some_and(|m| m.role.can_manage_members()) {
            return Err(TeamError::forbidden("Only team owners and admins can invite"));
        }

        let members = self.teams.list_members(&team.id).await?;
        if members.len() as u32 >= team.max_members {
            return Err(TeamError::capacity_exceeded(team.id, team.max_members));
        }

        let email = normalize_email(&cmd.email)?;
        if members.iter().any(|m| m.email.eq_ignore_ascii_case(&email)) {
            return Err(TeamError::conflict("Email is already a team member"));
        }

        let invitation = TeamInvitation::issue(
            team.id,
            &email,
            cmd.role,
            cmd.inviter_uid,
            self.ttl_days,
            cmd.now,
        )?;
        self.invitations.insert(&invitation).await?;

        tracing::info!(
            team_id = %team.id,
            invitation_id = %invitation.id,
            role = %invitation.role.as_str(),
            "Team invitation issued"
        );
        Ok(invitation)
    }
}
