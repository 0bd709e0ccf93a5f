//! AcceptInvitationHandler - Command handler for joining a team.
//!
//! The capacity check and the membership insert are one conditional write
//! in the repository, so two acceptances racing for the last seat cannot
//! both succeed. The joiner's entitlement is copied from the owner only
//! after the seat exists: a renewal committed earlier is copied, and a later
//! one reaches the joiner through propagation.

use std::sync::Arc;

use crate::domain::foundation::{InvitationId, Timestamp, UserId};
use crate::domain::team::{TeamError, TeamMembership};
use crate::ports::{AddMemberOutcome, InvitationRepository, TeamRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct AcceptInvitationCommand {
    pub invitation_id: InvitationId,
    pub uid: UserId,
    pub now: Timestamp,
}

pub struct AcceptInvitationHandler {
    teams: Arc<dyn TeamRepository>,
    invitations: Arc<dyn InvitationRepository>,
    users: Arc<dyn UserRepository>,
}

impl AcceptInvitationHandler {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        invitations: Arc<dyn InvitationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            teams,
            invitations,
            users,
        }
    }

    /// # Errors
    ///
    /// - `InvitationNotFound` if the invitation is unknown, used or expired
    /// - `Forbidden` if it was addressed to another email
    /// - `Conflict` if the caller is already in a team, including one joined
    ///   concurrently
    /// - `CapacityExceeded` if the team filled up since the invitation
    pub async fn handle(&self, cmd: AcceptInvitationCommand) -> Result<TeamMembership, TeamError> {
        let invitation = self
            .invitations
            .find_by_id(&cmd.invitation_id)
            .await?
            .filter(|i| i.is_open(cmd.now))
            .ok_or_else(|| TeamError::invitation_not_found(cmd.invitation_id))?;

        let joiner = self
            .users
            .find_by_id(&cmd.uid)
            .await?
            .ok_or_else(|| TeamError::user_not_found(cmd.uid.clone()))?;

        if !invitation.is_addressed_to(&joiner.email) {
            return Err(TeamError::forbidden("Invitation was sent to another email"));
        }
        if joiner.team_id.is_some() {
            return Err(TeamError::conflict("User already belongs to a team"));
        }

        let team = self
            .teams
            .find_by_id(&invitation.team_id)
            .await?
            .ok_or_else(|| TeamError::team_not_found(invitation.team_id))?;

        let membership = TeamMembership::new(
            team.id,
            joiner.id.clone(),
            joiner.email.clone(),
            invitation.role,
            cmd.now,
        );
        match self.teams.add_member(&membership, team.max_members).await? {
            AddMemberOutcome::Added => {}
            AddMemberOutcome::CapacityExceeded => {
                return Err(TeamError::capacity_exceeded(team.id, team.max_members));
            }
            AddMemberOutcome::AlreadyInTeam => {
                return Err(TeamError::conflict("User already belongs to a team"));
            }
        }

        if !self.invitations.mark_accepted(&invitation.id).await? {
            self.teams.remove_member(&team.id, &joiner.id).await?;
            return Err(TeamError::invitation_not_found(invitation.id));
        }

        self.users
            .set_team(&joiner.id, Some((team.id, invitation.role)), cmd.now)
            .await?;
        self.users
            .copy_entitlement(&team.owner_uid, &joiner.id, cmd.now)
            .await?;

        tracing::info!(
            team_id = %team.id,
            uid = %joiner.id,
            invitation_id = %invitation.id,
            "Team invitation accepted"
        );
        Ok(membership)
    }
}
