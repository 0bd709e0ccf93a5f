//! CreateTeamHandler - Command handler for opening a TEAM billing group.

use std::sync::Arc;

use crate::domain::entitlement::Plan;
use crate::domain::foundation::{TeamId, Timestamp, UserId};
use crate::domain::team::{Team, TeamError, TeamRole};
use crate::ports::{TeamRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateTeamCommand {
    pub uid: UserId,
    pub name: String,
    pub now: Timestamp,
}

pub struct CreateTeamHandler {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    max_members: u32,
}

impl CreateTeamHandler {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        max_members: u32,
    ) -> Self {
        Self {
            teams,
            users,
            max_members,
        }
    }

    /// # Errors
    ///
    /// - `UserNotFound` if the caller has no account
    /// - `Forbidden` unless the caller is on plan TEAM
    /// - `Conflict` if the caller already belongs to a team
    pub async fn handle(&self, cmd: CreateTeamCommand) -> Result<Team, TeamError> {
        let owner = self
            .users
            .find_by_id(&cmd.uid)
            .await?
            .ok_or_else(|| TeamError::user_not_found(cmd.uid.clone()))?;

        if owner.plan != Plan::Team {
            return Err(TeamError::forbidden("A TEAM plan is required to create a team"));
        }
        if owner.team_id.is_some() {
            return Err(TeamError::conflict("User already belongs to a team"));
        }

        let team = Team::create(TeamId::new(), &cmd.name, cmd.uid, self.max_members, cmd.now)?;
        self.teams
            .create(&team, &team.owner_membership(owner.email.clone()))
            .await?;

        self.users
            .set_team(&owner.id, Some((team.id, TeamRole::Owner)), cmd.now)
            .await?;

        tracing::info!(team_id = %team.id, owner = %team.owner_uid, "Team created");
        Ok(team)
    }
}
