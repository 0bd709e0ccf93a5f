//! GetStatsHandler - admin dashboard counters.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::entitlement::AccountError;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::PaymentStatus;
use crate::ports::{DownloadRepository, PaymentRepository, PlanStats, TeamRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetStatsQuery {
    pub now: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    #[serde(flatten)]
    pub plans: PlanStats,
    pub pending_payments: u64,
    pub total_teams: u64,
    pub total_downloads: u64,
}

pub struct GetStatsHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    teams: Arc<dyn TeamRepository>,
    downloads: Arc<dyn DownloadRepository>,
}

impl GetStatsHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentRepository>,
        teams: Arc<dyn TeamRepository>,
        downloads: Arc<dyn DownloadRepository>,
    ) -> Self {
        Self {
            users,
            payments,
            teams,
            downloads,
        }
    }

    pub async fn handle(&self, query: GetStatsQuery) -> Result<AdminStats, AccountError> {
        let (plans, pending_payments, total_teams, total_downloads) = tokio::try_join!(
            self.users.plan_stats(query.now),
            self.payments.count_by_status(PaymentStatus::Pending),
            self.teams.count(),
            self.downloads.count(),
        )?;

        Ok(AdminStats {
            plans,
            pending_payments,
            total_teams,
            total_downloads,
        })
    }
}
