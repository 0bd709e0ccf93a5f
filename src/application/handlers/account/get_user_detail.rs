//! GetUserDetailHandler - one account as seen from the admin console.

use std::sync::Arc;

use crate::application::handlers::team::TeamView;
use crate::domain::entitlement::{AccountError, UserAccount};
use crate::domain::foundation::UserId;
use crate::domain::payment::Payment;
use crate::ports::{PaymentRepository, TeamRepository, UserRepository};

/// Payments shown on the detail page.
pub const RECENT_PAYMENTS: usize = 20;

#[derive(Debug, Clone)]
pub struct GetUserDetailQuery {
    pub uid: UserId,
}

#[derive(Debug, Clone)]
pub struct UserDetail {
    pub account: UserAccount,
    pub team: Option<TeamView>,
    /// Newest first, at most [`RECENT_PAYMENTS`].
    pub payments: Vec<Payment>,
}

pub struct GetUserDetailHandler {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl GetUserDetailHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            users,
            teams,
            payments,
        }
    }

    pub async fn handle(&self, query: GetUserDetailQuery) -> Result<UserDetail, AccountError> {
        let account = self
            .users
            .find_by_id(&query.uid)
            .await?
            .ok_or_else(|| AccountError::not_found(query.uid.clone()))?;

        let team = match account.team_id {
            Some(team_id) => match self.teams.find_by_id(&team_id).await? {
                Some(team) => {
                    let members = self.teams.list_members(&team.id).await?;
                    Some(TeamView { team, members })
                }
                None => None,
            },
            None => None,
        };

        let mut payments = self.payments.list_by_user(&account.id).await?;
        payments.truncate(RECENT_PAYMENTS);

        Ok(UserDetail {
            account,
            team,
            payments,
        })
    }
}
