//! ReviewPaymentHandler - the payment review engine.
//!
//! 1. Commit the status transition through the payment store. Any failure
//!    here ends the call with no entitlement side effects.
//! 2. REJECTED: notify the payer with the note.
//! 3. APPROVED: renew the payer's window, write it, propagate it to the
//!    team for TEAM plans, notify the payer.
//!
//! The payer's own write must succeed for the call to succeed. Team member
//! writes are best-effort and only reported.

use std::sync::Arc;

use super::PaymentStore;
use crate::application::handlers::team::{PropagationReport, TeamPropagation};
use crate::domain::entitlement::{
    EntitlementPolicy, EntitlementSnapshot, EntitlementWindow, PaidPlan, Plan,
};
use crate::domain::foundation::{PaymentId, Timestamp, UserId};
use crate::domain::payment::{Payment, PaymentError, ReviewDecision};
use crate::ports::{PaymentNotifier, UserRepository};

#[derive(Debug, Clone)]
pub struct ReviewPaymentCommand {
    pub payment_id: PaymentId,
    pub decision: ReviewDecision,
    pub note: Option<String>,
    pub reviewer_id: UserId,
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct ReviewPaymentResult {
    pub payment: Payment,

    /// Window written to the payer. `None` for rejections.
    pub window: Option<EntitlementWindow>,

    /// Team fan-out outcome. `None` when no propagation ran.
    pub propagation: Option<PropagationReport>,
}

pub struct ReviewPaymentHandler {
    store: PaymentStore,
    users: Arc<dyn UserRepository>,
    propagation: TeamPropagation,
    notifier: Arc<dyn PaymentNotifier>,
    policy: EntitlementPolicy,
}

impl ReviewPaymentHandler {
    pub fn new(
        store: PaymentStore,
        users: Arc<dyn UserRepository>,
        propagation: TeamPropagation,
        notifier: Arc<dyn PaymentNotifier>,
        policy: EntitlementPolicy,
    ) -> Self {
        Self {
            store,
            users,
            propagation,
            notifier,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReviewPaymentCommand,
    ) -> Result<ReviewPaymentResult, PaymentError> {
        let payment = self
            .store
            .review(cmd.payment_id, cmd.decision, cmd.note, cmd.reviewer_id, cmd.now)
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            decision = %payment.status,
            reviewer = ?payment.reviewed_by,
            "Payment reviewed"
        );

        match cmd.decision {
            ReviewDecision::Rejected => {
                if let Err(e) = self.notifier.payment_rejected(&payment).await {
                    tracing::warn!(payment_id = %payment.id, error = %e, "Rejection notification failed");
                }
                Ok(ReviewPaymentResult {
                    payment,
                    window: None,
                    propagation: None,
                })
            }
            ReviewDecision::Approved => self.apply_approval(payment, cmd.now).await,
        }
    }

    async fn apply_approval(
        &self,
        payment: Payment,
        now: Timestamp,
    ) -> Result<ReviewPaymentResult, PaymentError> {
        let payer = match self.users.find_by_id(&payment.uid).await? {
            Some(payer) => payer,
            None => {
                tracing::error!(
                    payment_id = %payment.id,
                    uid = %payment.uid,
                    "Approved payment has no payer account"
                );
                return Err(PaymentError::payer_not_found(payment.uid.clone()));
            }
        };

        let window = self.policy.renew(payer.plan_expires_at, now);
        let snapshot = EntitlementSnapshot {
            plan: Plan::from(payment.plan_requested),
            plan_expires_at: Some(window.expires_at),
            grace_until: Some(window.grace_until),
        };

        if let Err(e) = self
            .users
            .apply_entitlement(&payer.id, &snapshot, now)
            .await
        {
            tracing::error!(
                payment_id = %payment.id,
                uid = %payer.id,
                error = %e,
                "Payment approved but payer entitlement write failed"
            );
            return Err(e.into());
        }

        let propagation = match (payment.plan_requested, payment.team_id.or(payer.team_id)) {
            (PaidPlan::Team, Some(team_id)) => {
                match self
                    .propagation
                    .propagate(team_id, window, Some(&payer.id), now)
                    .await
                {
                    Ok(report) => Some(report),
                    Err(e) => {
                        tracing::warn!(
                            payment_id = %payment.id,
                            team_id = %team_id,
                            error = %e,
                            "Team propagation skipped"
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        if let Err(e) = self
            .notifier
            .payment_approved(&payment, window.expires_at)
            .await
        {
            tracing::warn!(payment_id = %payment.id, error = %e, "Approval notification failed");
        }

        Ok(ReviewPaymentResult {
            payment,
            window: Some(window),
            propagation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentRepository, InMemoryTeamRepository, InMemoryUserRepository,
    };
    use crate::adapters::notification::{RecordingNotifier, SentNotification};
    use crate::domain::entitlement::UserAccount;
    use crate::domain::foundation::TeamId;
    use crate::domain::payment::{
        BillingMonth, Currency, Money, PaymentChannel, PaymentStatus, PaymentSubmission,
    };
    use crate::domain::team::{Team, TeamMembership, TeamRole};

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2026-03-15T12:00:00Z").unwrap()
    }

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn payment_for(payer: &UserAccount, plan: PaidPlan) -> Payment {
        Payment::submit(
            PaymentId::new(),
            payer.id.clone(),
            payer.email.clone(),
            payer.team_id,
            PaymentSubmission {
                plan_requested: plan,
                channel: PaymentChannel::Moncash,
                bank_name: None,
                amount: Money::new(100_000, Currency::Htg).unwrap(),
                billing_month: BillingMonth::parse("2026-03").unwrap(),
                reference: "MC-9".into(),
            },
            now().minus_days(1),
        )
        .unwrap()
    }

    fn account(id: &str) -> UserAccount {
        UserAccount::register(uid(id), &format!("{id}@kantik.ht"), now().minus_days(100)).unwrap()
    }

    fn with_expiry(mut acc: UserAccount, plan: Plan, expires_in_days: i64) -> UserAccount {
        acc.grant(
            plan,
            EntitlementPolicy::default().window_ending_at(now().plus_days(expires_in_days)),
            now().minus_days(60),
        );
        acc
    }

    struct Fixture {
        handler: ReviewPaymentHandler,
        users: Arc<InMemoryUserRepository>,
        payments: Arc<InMemoryPaymentRepository>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(
        users: InMemoryUserRepository,
        payments: InMemoryPaymentRepository,
        teams: InMemoryTeamRepository,
    ) -> Fixture {
        let users = Arc::new(users);
        let payments = Arc::new(payments);
        let notifier = Arc::new(RecordingNotifier::new());
        let handler = ReviewPaymentHandler::new(
            PaymentStore::new(payments.clone()),
            users.clone(),
            TeamPropagation::new(Arc::new(teams), users.clone()),
            notifier.clone(),
            EntitlementPolicy::default(),
        );
        Fixture {
            handler,
            users,
            payments,
            notifier,
        }
    }

    fn approve(payment: &Payment) -> ReviewPaymentCommand {
        ReviewPaymentCommand {
            payment_id: payment.id,
            decision: ReviewDecision::Approved,
            note: None,
            reviewer_id: uid("admin"),
            now: now(),
        }
    }

    fn reject(payment: &Payment, note: &str) -> ReviewPaymentCommand {
        ReviewPaymentCommand {
            payment_id: payment.id,
            decision: ReviewDecision::Rejected,
            note: Some(note.to_string()),
            reviewer_id: uid("admin"),
            now: now(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Renewal window
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_approval_starts_window_now() {
        let payer = account("payer");
        let payment = payment_for(&payer, PaidPlan::Standard);
        let f = fixture(
            InMemoryUserRepository::new().with_account(payer),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        let result = f.handler.handle(approve(&payment)).await.unwrap();

        let stored = f.users.get(&uid("payer")).unwrap();
        assert_eq!(stored.plan, Plan::Standard);
        assert_eq!(stored.plan_expires_at, Some(now().plus_days(30)));
        assert_eq!(stored.grace_until, Some(now().plus_days(33)));
        assert_eq!(result.window.unwrap().expires_at, now().plus_days(30));
        assert_eq!(result.payment.status, PaymentStatus::Approved);
    }

    #[tokio::test]
    async fn approval_stacks_on_unexpired_plan() {
        let payer = with_expiry(account("payer"), Plan::Standard, 10);
        let payment = payment_for(&payer, PaidPlan::Standard);
        let f = fixture(
            InMemoryUserRepository::new().with_account(payer),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        f.handler.handle(approve(&payment)).await.unwrap();

        let stored = f.users.get(&uid("payer")).unwrap();
        assert_eq!(stored.plan_expires_at, Some(now().plus_days(40)));
        assert_eq!(stored.grace_until, Some(now().plus_days(43)));
    }

    #[tokio::test]
    async fn approval_after_lapse_restarts_from_now() {
        let payer = with_expiry(account("payer"), Plan::Standard, -5);
        let payment = payment_for(&payer, PaidPlan::Standard);
        let f = fixture(
            InMemoryUserRepository::new().with_account(payer),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        f.handler.handle(approve(&payment)).await.unwrap();

        assert_eq!(
            f.users.get(&uid("payer")).unwrap().plan_expires_at,
            Some(now().plus_days(30))
        );
    }

    #[tokio::test]
    async fn approval_sends_expiry_to_payer() {
        let payer = account("payer");
        let payment = payment_for(&payer, PaidPlan::Standard);
        let f = fixture(
            InMemoryUserRepository::new().with_account(payer),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        f.handler.handle(approve(&payment)).await.unwrap();

        assert_eq!(
            f.notifier.sent(),
            vec![SentNotification::Approved {
                payment_id: payment.id,
                to: "payer@kantik.ht".into(),
                expires_at: now().plus_days(30),
            }]
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Idempotency and rejection
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn second_review_fails_and_changes_nothing() {
        let payer = account("payer");
        let payment = payment_for(&payer, PaidPlan::Standard);
        let f = fixture(
            InMemoryUserRepository::new().with_account(payer),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        f.handler.handle(approve(&payment)).await.unwrap();
        let after_first = f.users.get(&uid("payer")).unwrap();

        let mut again = approve(&payment);
        again.now = now().plus_days(5);
        let err = f.handler.handle(again).await.unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyReviewed { .. }));
        assert_eq!(f.users.get(&uid("payer")).unwrap(), after_first);
        assert_eq!(f.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn rejection_never_touches_entitlement() {
        let payer = with_expiry(account("payer"), Plan::Standard, 3);
        let before = payer.clone();
        let payment = payment_for(&payer, PaidPlan::Team);
        let f = fixture(
            InMemoryUserRepository::new().with_account(payer),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        let result = f
            .handler
            .handle(reject(&payment, "Wrong amount"))
            .await
            .unwrap();

        assert!(result.window.is_none());
        assert_eq!(f.users.get(&uid("payer")).unwrap(), before);
        assert_eq!(
            f.payments.get(&payment.id).unwrap().status,
            PaymentStatus::Rejected
        );
        assert_eq!(
            f.notifier.sent(),
            vec![SentNotification::Rejected {
                payment_id: payment.id,
                to: "payer@kantik.ht".into(),
                note: Some("Wrong amount".into()),
            }]
        );
    }

    #[tokio::test]
    async fn unknown_payment_is_not_found() {
        let f = fixture(
            InMemoryUserRepository::new(),
            InMemoryPaymentRepository::new(),
            InMemoryTeamRepository::new(),
        );
        let cmd = ReviewPaymentCommand {
            payment_id: PaymentId::new(),
            decision: ReviewDecision::Approved,
            note: None,
            reviewer_id: uid("admin"),
            now: now(),
        };

        assert!(matches!(
            f.handler.handle(cmd).await.unwrap_err(),
            PaymentError::NotFound(_)
        ));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Team propagation
    // ════════════════════════════════════════════════════════════════════════════

    fn team_of_four() -> (Team, InMemoryUserRepository, InMemoryTeamRepository, UserAccount) {
        let team = Team::create(TeamId::new(), "Praise", uid("owner"), 7, now()).unwrap();
        let mut users = InMemoryUserRepository::new();
        let mut members = Vec::new();
        let mut owner = None;
        for (id, role) in [
            ("owner", TeamRole::Owner),
            ("m1", TeamRole::Admin),
            ("m2", TeamRole::Member),
            ("m3", TeamRole::Member),
        ] {
            let mut acc = account(id);
            acc.join_team(team.id, role, now());
            members.push(TeamMembership::new(team.id, uid(id), acc.email.clone(), role, now()));
            if role == TeamRole::Owner {
                owner = Some(acc.clone());
            }
            users = users.with_account(acc);
        }
        let teams = InMemoryTeamRepository::new().with_team(team.clone(), members);
        (team, users, teams, owner.unwrap())
    }

    #[tokio::test]
    async fn team_approval_updates_all_four_members_identically() {
        let (_team, users, teams, owner) = team_of_four();
        let payment = payment_for(&owner, PaidPlan::Team);
        let f = fixture(
            users,
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            teams,
        );

        let result = f.handler.handle(approve(&payment)).await.unwrap();

        let report = result.propagation.unwrap();
        assert_eq!(report.updated.len(), 3);
        assert!(!report.updated.contains(&uid("owner")));
        for id in ["owner", "m1", "m2", "m3"] {
            let acc = f.users.get(&uid(id)).unwrap();
            assert_eq!(acc.plan, Plan::Team, "{id}");
            assert_eq!(acc.plan_expires_at, Some(now().plus_days(30)), "{id}");
            assert_eq!(acc.grace_until, Some(now().plus_days(33)), "{id}");
        }
    }

    #[tokio::test]
    async fn propagation_uses_team_snapshot_after_payer_left() {
        let (team, users, teams, owner) = team_of_four();
        let payment = payment_for(&owner, PaidPlan::Team);
        let mut departed = owner.clone();
        departed.leave_team(now());
        let users = users.with_account(departed);
        let f = fixture(
            users,
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            teams,
        );

        let result = f.handler.handle(approve(&payment)).await.unwrap();

        assert_eq!(payment.team_id, Some(team.id));
        assert_eq!(result.propagation.unwrap().updated.len(), 3);
        assert_eq!(f.users.get(&uid("m2")).unwrap().plan, Plan::Team);
    }

    #[tokio::test]
    async fn standard_approval_does_not_propagate() {
        let (_team, users, teams, owner) = team_of_four();
        let payment = payment_for(&owner, PaidPlan::Standard);
        let f = fixture(
            users,
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            teams,
        );

        let result = f.handler.handle(approve(&payment)).await.unwrap();

        assert!(result.propagation.is_none());
        assert_eq!(f.users.get(&uid("m1")).unwrap().plan, Plan::Free);
    }

    #[tokio::test]
    async fn missing_payer_fails_after_commit() {
        let payer = account("payer");
        let payment = payment_for(&payer, PaidPlan::Standard);
        let f = fixture(
            InMemoryUserRepository::new(),
            InMemoryPaymentRepository::new().with_payment(payment.clone()),
            InMemoryTeamRepository::new(),
        );

        let err = f.handler.handle(approve(&payment)).await.unwrap_err();

        assert!(matches!(err, PaymentError::PayerNotFound(_)));
        assert_eq!(
            f.payments.get(&payment.id).unwrap().status,
            PaymentStatus::Approved
        );
    }
}
