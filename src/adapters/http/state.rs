//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::account::{
    ChangeRoleHandler, GetEntitlementHandler, GetStatsHandler, GetUserDetailHandler,
    ListUsersHandler, ProvisionAccountCommand, ProvisionAccountHandler, ResetPlanHandler,
    UpdateUserPlanHandler,
};
use crate::application::handlers::download::{GetLibraryHandler, RecordDownloadHandler};
use crate::application::handlers::payment::{
    AttachReceiptHandler, GetPaymentHandler, GetReceiptHandler, ListMyPaymentsHandler,
    ListPaymentsHandler, PaymentStore, ReviewPaymentHandler, SubmitPaymentHandler,
};
use crate::application::handlers::team::{
    AcceptInvitationHandler, CreateTeamHandler, GetMyTeamHandler, InviteMemberHandler,
    RemoveMemberHandler, TeamPropagation,
};
use crate::domain::entitlement::{AccountError, EntitlementPolicy, UserAccount};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::ports::{
    Clock, ContentCatalog, DownloadRepository, InvitationRepository, PaymentNotifier,
    PaymentRepository, TeamRepository, UserRepository,
};

/// Ports and policy shared by every request.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub invitations: Arc<dyn InvitationRepository>,
    pub catalog: Arc<dyn ContentCatalog>,
    pub downloads: Arc<dyn DownloadRepository>,
    pub notifier: Arc<dyn PaymentNotifier>,
    pub clock: Arc<dyn Clock>,
    pub policy: EntitlementPolicy,
}

impl AppState {
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// The caller's stored account, created FREE on first sight.
    pub async fn current_account(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<UserAccount, AccountError> {
        ProvisionAccountHandler::new(self.users.clone())
            .find_or_provision(ProvisionAccountCommand {
                uid: user.id.clone(),
                email: user.email.clone(),
                grant_admin: user.is_admin,
                now: self.now(),
            })
            .await
    }

    /// Like [`current_account`](Self::current_account) but requires the
    /// stored role to be ADMIN.
    pub async fn require_admin(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<UserAccount, AccountError> {
        let account = self.current_account(user).await?;
        if !account.is_admin() {
            tracing::debug!(uid = %account.id, "Admin endpoint refused");
            return Err(AccountError::forbidden("Administrator role required"));
        }
        Ok(account)
    }

    fn payment_store(&self) -> PaymentStore {
        PaymentStore::new(self.payments.clone())
    }

    // ─── Accounts ───────────────────────────────────────────────────────

    pub fn get_entitlement_handler(&self) -> GetEntitlementHandler {
        GetEntitlementHandler::new(self.users.clone())
    }

    pub fn update_plan_handler(&self) -> UpdateUserPlanHandler {
        UpdateUserPlanHandler::new(self.users.clone(), self.policy.grace_days)
    }

    pub fn reset_plan_handler(&self) -> ResetPlanHandler {
        ResetPlanHandler::new(self.users.clone())
    }

    pub fn change_role_handler(&self) -> ChangeRoleHandler {
        ChangeRoleHandler::new(self.users.clone())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.users.clone(), self.teams.clone())
    }

    pub fn user_detail_handler(&self) -> GetUserDetailHandler {
        GetUserDetailHandler::new(self.users.clone(), self.teams.clone(), self.payments.clone())
    }

    pub fn stats_handler(&self) -> GetStatsHandler {
        GetStatsHandler::new(
            self.users.clone(),
            self.payments.clone(),
            self.teams.clone(),
            self.downloads.clone(),
        )
    }

    // ─── Payments ───────────────────────────────────────────────────────

    pub fn submit_payment_handler(&self) -> SubmitPaymentHandler {
        SubmitPaymentHandler::new(self.users.clone(), self.payment_store(), self.notifier.clone())
    }

    pub fn attach_receipt_handler(&self) -> AttachReceiptHandler {
        AttachReceiptHandler::new(self.payment_store())
    }

    pub fn list_my_payments_handler(&self) -> ListMyPaymentsHandler {
        ListMyPaymentsHandler::new(self.payments.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.payments.clone())
    }

    pub fn get_payment_handler(&self) -> GetPaymentHandler {
        GetPaymentHandler::new(self.payments.clone(), self.users.clone())
    }

    pub fn get_receipt_handler(&self) -> GetReceiptHandler {
        GetReceiptHandler::new(self.payments.clone())
    }

    pub fn review_payment_handler(&self) -> ReviewPaymentHandler {
        ReviewPaymentHandler::new(
            self.payment_store(),
            self.users.clone(),
            TeamPropagation::new(self.teams.clone(), self.users.clone()),
            self.notifier.clone(),
            self.policy,
        )
    }

    // ─── Teams ──────────────────────────────────────────────────────────

    pub fn get_my_team_handler(&self) -> GetMyTeamHandler {
        GetMyTeamHandler::new(self.teams.clone(), self.users.clone())
    }

    pub fn create_team_handler(&self) -> CreateTeamHandler {
        CreateTeamHandler::new(
            self.teams.clone(),
            self.users.clone(),
            self.policy.max_team_members,
        )
    }

    pub fn invite_member_handler(&self) -> InviteMemberHandler {
        InviteMemberHandler::new(
            self.teams.clone(),
            self.invitations.clone(),
            self.policy.invitation_ttl_days,
        )
    }

    pub fn accept_invitation_handler(&self) -> AcceptInvitationHandler {
        AcceptInvitationHandler::new(
            self.teams.clone(),
            self.invitations.clone(),
            self.users.clone(),
        )
    }

    pub fn remove_member_handler(&self) -> RemoveMemberHandler {
        RemoveMemberHandler::new(self.teams.clone(), self.users.clone())
    }

    // ─── Downloads ──────────────────────────────────────────────────────

    pub fn record_download_handler(&self) -> RecordDownloadHandler {
        RecordDownloadHandler::new(
            self.users.clone(),
            self.catalog.clone(),
            self.downloads.clone(),
        )
    }

    pub fn get_library_handler(&self) -> GetLibraryHandler {
        GetLibraryHandler::new(self.downloads.clone())
    }
}
