//! In-memory user repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::entitlement::{
    is_plan_active, AccountRole, EntitlementSnapshot, Plan, UserAccount,
};
use crate::domain::foundation::{DomainError, ErrorCode, TeamId, Timestamp, UserId};
use crate::domain::team::TeamRole;
use crate::ports::{PlanStats, UserRepository};

/// Accounts keyed by id behind one mutex.
///
/// Every write happens under the lock and changes only its own fields of
/// the stored account.
#[derive(Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account, replacing any existing one with the same id.
    pub fn with_account(self, account: UserAccount) -> Self {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(account.id.clone(), account);
        self
    }

    /// Snapshot of one account for assertions.
    pub fn get(&self, id: &UserId) -> Option<UserAccount> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn not_found(id: &UserId) -> DomainError {
        DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", id))
    }

    fn modify(&self, id: &UserId, change: impl FnOnce(&mut UserAccount)) -> Result<(), DomainError> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        let account = accounts.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        change(account);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), DomainError> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(&account.id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("User {} already exists", account.id),
            ));
        }
        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Email already registered",
            ));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DomainError> {
        let mut all: Vec<_> = self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn set_role(
        &self,
        id: &UserId,
        role: AccountRole,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.modify(id, |account| account.set_role(role, now))
    }

    async fn set_team(
        &self,
        id: &UserId,
        team: Option<(TeamId, TeamRole)>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.modify(id, |account| match team {
            Some((team_id, role)) => account.join_team(team_id, role, now),
            None => account.leave_team(now),
        })
    }

    async fn apply_entitlement(
        &self,
        id: &UserId,
        snapshot: &EntitlementSnapshot,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.modify(id, |account| account.apply_entitlement(*snapshot, now))
    }

    async fn copy_entitlement(
        &self,
        from: &UserId,
        to: &UserId,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = accounts
            .get(from)
            .map(UserAccount::entitlement)
            .ok_or_else(|| Self::not_found(from))?;
        let target = accounts.get_mut(to).ok_or_else(|| Self::not_found(to))?;
        target.apply_entitlement(snapshot, now);
        Ok(())
    }

    async fn plan_stats(&self, now: Timestamp) -> Result<PlanStats, DomainError> {
        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stats = PlanStats {
            total_users: accounts.len() as u64,
            ..PlanStats::default()
        };
        for account in accounts.values() {
            let active = is_plan_active(&account.entitlement(), now);
            match account.plan {
                Plan::Standard => {
                    stats.standard_users += 1;
                    if active {
                        stats.active_standard += 1;
                    }
                }
                Plan::Team => {
                    stats.team_users += 1;
                    if active {
                        stats.active_team += 1;
                    }
                }
                Plan::Free => {}
            }
        }
        Ok(stats)
    }
}
