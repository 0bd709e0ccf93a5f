//! ProvisionAccountHandler - creates the local account for an identity.

use std::sync::Arc;

use crate::domain::entitlement::{AccountError, AccountRole, UserAccount};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct ProvisionAccountCommand {
    pub uid: UserId,
    pub email: String,

    /// Seeds the ADMIN role. Only honoured when the account is created.
    pub grant_admin: bool,

    pub now: Timestamp,
}

pub struct ProvisionAccountHandler {
    users: Arc<dyn UserRepository>,
}

impl ProvisionAccountHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Creates a FREE account. Duplicate id or email is a `Conflict`.
    pub async fn handle(&self, cmd: ProvisionAccountCommand) -> Result<UserAccount, AccountError> {
        let mut account = UserAccount::register(cmd.uid, &cmd.email, cmd.now)?;
        if cmd.grant_admin {
            account.set_role(AccountRole::Admin, cmd.now);
        }
        self.users.insert(&account).await?;

        tracing::info!(uid = %account.id, role = account.role.as_str(), "Account provisioned");
        Ok(account)
    }

    /// Returns the stored account, provisioning it on first sight.
    pub async fn find_or_provision(
        &self,
        cmd: ProvisionAccountCommand,
    ) -> Result<UserAccount, AccountError> {
        if let Some(account) = self.users.find_by_id(&cmd.uid).await? {
            return Ok(account);
        }
        self.handle(cmd).await
    }
}
