//! Team propagation - fans a TEAM entitlement window out to every member.
//!
//! Each member write is an independent single-row update. Writes run
//! concurrently; a failed member is logged and reported, never retried and
//! never rolled back. Re-running the propagation converges the stragglers.

use futures::future::join_all;
use std::sync::Arc;

use crate::domain::entitlement::{EntitlementSnapshot, EntitlementWindow, Plan};
use crate::domain::foundation::{TeamId, Timestamp, UserId};
use crate::domain::team::TeamError;
use crate::ports::{TeamRepository, UserRepository};

/// Outcome of one propagation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub updated: Vec<UserId>,
    pub failed: Vec<UserId>,
}

impl PropagationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone)]
pub struct TeamPropagation {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamPropagation {
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    /// Sets plan TEAM and `window` on every member of `team_id` except
    /// `exclude_uid`.
    ///
    /// Fails only if the membership list cannot be read.
    pub async fn propagate(
        &self,
        team_id: TeamId,
        window: EntitlementWindow,
        exclude_uid: Option<&UserId>,
        now: Timestamp,
    ) -> Result<PropagationReport, TeamError> {
        let members = self.teams.list_members(&team_id).await?;
        let snapshot = EntitlementSnapshot {
            plan: Plan::Team,
            plan_expires_at: Some(window.expires_at),
            grace_until: Some(window.grace_until),
        };

        let targets: Vec<UserId> = members
            .into_iter()
            .map(|m| m.uid)
            .filter(|uid| Some(uid) != exclude_uid)
            .collect();

        let writes = targets.iter().map(|uid| {
            let users = Arc::clone(&self.users);
            async move { users.apply_entitlement(uid, &snapshot, now).await }
        });
        let results = join_all(writes).await;

        let mut report = PropagationReport::default();
        for (uid, result) in targets.into_iter().zip(results) {
            match result {
                Ok(()) => report.updated.push(uid),
                Err(e) => {
                    tracing::warn!(
                        team_id = %team_id,
                        uid = %uid,
                        error = %e,
                        "Team entitlement propagation failed for member"
                    );
                    report.failed.push(uid);
                }
            }
        }

        tracing::info!(
            team_id = %team_id,
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Team entitlement propagated"
        );
        Ok(report)
    }
}
