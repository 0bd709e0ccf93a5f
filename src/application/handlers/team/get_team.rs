//! GetMyTeamHandler - Query handler for the caller's team.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::team::{Team, TeamError, TeamMembership};
use crate::ports::{TeamRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetMyTeamQuery {
    pub uid: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamView {
    pub team: Team,
    pub members: Vec<TeamMembership>,
}

pub struct GetMyTeamHandler {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl GetMyTeamHandler {
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    /// `None` when the caller is not in a team.
    pub async fn handle(&self, query: GetMyTeamQuery) -> Result<Option<TeamView>, TeamError> {
        let account = self
            .users
            .find_by_id(&query.uid)
            .await?
            .ok_or_else(|| TeamError::user_not_found(query.uid.clone()))?;

        let Some(team_id) = account.team_id else {
            return Ok(None);
        };
        let Some(team) = self.teams.find_by_id(&team_id).await? else {
            return Ok(None);
        };
        let members = self.teams.list_members(&team.id).await?;

        Ok(Some(TeamView { team, members }))
    }
}
