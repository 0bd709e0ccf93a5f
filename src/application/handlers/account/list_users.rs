//! ListUsersHandler - admin directory of every account.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;

use crate::domain::entitlement::{AccountError, UserAccount};
use crate::domain::foundation::TeamId;
use crate::ports::{TeamRepository, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery;

/// One directory row. `team_member_count` is 0 outside a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub account: UserAccount,
    pub team_member_count: usize,
}

pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self { users, teams }
    }

    /// Oldest account first. Each team's members are counted once.
    pub async fn handle(&self, _query: ListUsersQuery) -> Result<Vec<UserSummary>, AccountError> {
        let accounts = self.users.list().await?;

        let mut team_ids: Vec<TeamId> = accounts.iter().filter_map(|a| a.team_id).collect();
        team_ids.sort_by_key(|id| *id.as_uuid());
        team_ids.dedup();

        let counts: HashMap<TeamId, usize> = try_join_all(team_ids.into_iter().map(|id| async move {
            let members = self.teams.list_members(&id).await?;
            Ok::<_, AccountError>((id, members.len()))
        }))
        .await?
        .into_iter()
        .collect();

        Ok(accounts
            .into_iter()
            .map(|account| UserSummary {
                team_member_count: account
                    .team_id
                    .and_then(|id| counts.get(&id).copied())
                    .unwrap_or(0),
                account,
            })
            .collect())
    }
}
