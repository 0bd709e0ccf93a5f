//! Admin plan overrides: set a plan by hand or reset to FREE.

use std::sync::Arc;

use crate::domain::entitlement::{AccountError, EntitlementSnapshot, Plan, UserAccount};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::UserRepository;

/// Fields left `None` keep their stored value.
#[derive(Debug, Clone)]
pub struct UpdateUserPlanCommand {
    pub uid: UserId,
    pub plan: Option<Plan>,
    pub plan_expires_at: Option<Timestamp>,
    pub grace_until: Option<Timestamp>,
    pub now: Timestamp,
}

pub struct UpdateUserPlanHandler {
    users: Arc<dyn UserRepository>,
    grace_days: i64,
}

impl UpdateUserPlanHandler {
    pub fn new(users: Arc<dyn UserRepository>, grace_days: i64) -> Self {
        Self { users, grace_days }
    }

    /// FREE clears both timestamps. A new expiry without an explicit grace
    /// date gets the standard grace period after it. Only the entitlement
    /// columns are written.
    pub async fn handle(&self, cmd: UpdateUserPlanCommand) -> Result<UserAccount, AccountError> {
        let mut account = load(self.users.as_ref(), &cmd.uid).await?;

        let snapshot = self.resolve(&account, &cmd)?;
        self.users
            .apply_entitlement(&cmd.uid, &snapshot, cmd.now)
            .await?;
        account.apply_entitlement(snapshot, cmd.now);

        tracing::info!(
            uid = %account.id,
            plan = %account.plan,
            expires_at = ?account.plan_expires_at,
            "Plan overridden by admin"
        );
        Ok(account)
    }

    fn resolve(
        &self,
        account: &UserAccount,
        cmd: &UpdateUserPlanCommand,
    ) -> Result<EntitlementSnapshot, AccountError> {
        let plan = cmd.plan.unwrap_or(account.plan);
        if plan == Plan::Free {
            return Ok(EntitlementSnapshot::free());
        }

        let plan_expires_at = cmd.plan_expires_at.or(account.plan_expires_at);
        let grace_until = match (cmd.grace_until, cmd.plan_expires_at) {
            (Some(grace), _) => Some(grace),
            (None, Some(expires)) => Some(expires.plus_days(self.grace_days)),
            (None, None) => account.grace_until,
        };

        let Some(expires) = plan_expires_at else {
            return Err(AccountError::validation(
                "plan_expires_at",
                "a paid plan needs an expiry date",
            ));
        };
        if grace_until.is_some_and(|grace| grace < expires) {
            return Err(AccountError::validation(
                "grace_until",
                "grace period cannot end before the plan",
            ));
        }

        Ok(EntitlementSnapshot {
            plan,
            plan_expires_at,
            grace_until,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResetPlanCommand {
    pub uid: UserId,
    pub now: Timestamp,
}

/// Puts an account back on FREE. Team membership is left alone.
pub struct ResetPlanHandler {
    users: Arc<dyn UserRepository>,
}

impl ResetPlanHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: ResetPlanCommand) -> Result<UserAccount, AccountError> {
        let mut account = load(self.users.as_ref(), &cmd.uid).await?;

        let free = EntitlementSnapshot::free();
        self.users.apply_entitlement(&cmd.uid, &free, cmd.now).await?;
        account.apply_entitlement(free, cmd.now);

        tracing::info!(uid = %account.id, "Plan reset to FREE");
        Ok(account)
    }
}

async fn load(users: &dyn UserRepository, uid: &UserId) -> Result<UserAccount, AccountError> {
    users
        .find_by_id(uid)
        .await?
        .ok_or_else(|| AccountError::not_found(uid.clone()))
}
