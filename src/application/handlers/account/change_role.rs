//! ChangeRoleHandler - promote or demote platform admins.

use std::sync::Arc;

use crate::domain::entitlement::{AccountError, AccountRole, UserAccount};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct ChangeRoleCommand {
    pub actor_uid: UserId,
    pub target_uid: UserId,
    pub role: AccountRole,
    pub now: Timestamp,
}

pub struct ChangeRoleHandler {
    users: Arc<dyn UserRepository>,
}

impl ChangeRoleHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// An admin cannot demote themselves. Only the role column is written.
    pub async fn handle(&self, cmd: ChangeRoleCommand) -> Result<UserAccount, AccountError> {
        if cmd.role == AccountRole::User && cmd.actor_uid == cmd.target_uid {
            return Err(AccountError::forbidden("Admins cannot demote themselves"));
        }

        let account = self.load(&cmd.target_uid).await?;
        if account.role == cmd.role {
            return Ok(account);
        }

        self.users
            .set_role(&cmd.target_uid, cmd.role, cmd.now)
            .await?;
        tracing::info!(
            uid = %cmd.target_uid,
            role = %cmd.role.as_str(),
            actor = %cmd.actor_uid,
            "Account role changed"
        );
        self.load(&cmd.target_uid).await
    }

    async fn load(&self, uid: &UserId) -> Result<UserAccount, AccountError> {
        self.users
            .find_by_id(uid)
            .await?
            .ok_or_else(|| AccountError::not_found(uid.clone()))
    }
}
