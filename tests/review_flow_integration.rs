//! Integration tests for the payment review flow.
//!
//! Drives the application handlers over the in-memory adapters:
//! 1. Submission, receipt and approval extend the payer's window
//! 2. A second review of the same payment is refused and changes nothing
//! 3. TEAM approvals reach every member of the payer's team
//! 4. Download checks follow the resulting plans

use std::sync::Arc;

use kantik::adapters::clock::FixedClock;
use kantik::adapters::memory::{
    InMemoryContentStore, InMemoryPaymentRepository, InMemoryTeamRepository,
    InMemoryUserRepository,
};
use kantik::adapters::notification::RecordingNotifier;
use kantik::application::handlers::account::{GetEntitlementHandler, GetEntitlementQuery};
use kantik::application::handlers::download::{
    GetLibraryHandler, GetLibraryQuery, RecordDownloadCommand, RecordDownloadHandler,
};
use kantik::application::handlers::payment::{
    AttachReceiptCommand, AttachReceiptHandler, PaymentStore, ReviewPaymentCommand,
    ReviewPaymentHandler, SubmitPaymentCommand, SubmitPaymentHandler,
};
use kantik::application::handlers::team::{
    AcceptInvitationCommand, AcceptInvitationHandler, CreateTeamCommand, CreateTeamHandler,
    InviteMemberCommand, InviteMemberHandler, TeamPropagation,
};
use kantik::domain::download::{DownloadError, ResourceType};
use kantik::domain::entitlement::{AccessTier, EntitlementPolicy, PaidPlan, Plan, UserAccount};
use kantik::domain::foundation::{ContentId, ErrorCode, PaymentId, Timestamp, UserId};
use kantik::domain::payment::{
    BillingMonth, Currency, Money, Payment, PaymentChannel, PaymentStatus, PaymentSubmission,
    Receipt, ReviewDecision,
};
use kantik::domain::team::TeamRole;
use kantik::ports::{Clock, UserRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct World {
    users: Arc<InMemoryUserRepository>,
    payments: Arc<InMemoryPaymentRepository>,
    teams: Arc<InMemoryTeamRepository>,
    content: Arc<InMemoryContentStore>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<FixedClock>,
    policy: EntitlementPolicy,
}

impl World {
    fn new() -> Self {
        let content = InMemoryContentStore::new()
            .with_content("misa-kreyol", "Misa Kreyol", AccessTier::Standard)
            .with_resource("misa-kreyol", "pdf", "misa-kreyol.pdf")
            .with_content("ave-maria", "Ave Maria (SATB)", AccessTier::Premium)
            .with_resource("ave-maria", "pdf", "ave-maria.pdf")
            .with_resource("ave-maria", "audio", "ave-maria.mp3");

        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
            teams: Arc::new(InMemoryTeamRepository::new()),
            content: Arc::new(content),
            notifier: Arc::new(RecordingNotifier::new()),
            clock: Arc::new(FixedClock::new(
                Timestamp::parse_rfc3339("2026-03-01T12:00:00Z").unwrap(),
            )),
            policy: EntitlementPolicy::default(),
        }
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    async fn register(&self, uid: &str) -> UserId {
        let id = UserId::new(uid).unwrap();
        let account =
            UserAccount::register(id.clone(), &format!("{uid}@kantik.ht"), self.now()).unwrap();
        self.users.insert(&account).await.unwrap();
        id
    }

    fn account(&self, uid: &UserId) -> UserAccount {
        self.users.get(uid).unwrap()
    }

    fn store(&self) -> PaymentStore {
        PaymentStore::new(self.payments.clone())
    }

    async fn submit(&self, uid: &UserId, plan: PaidPlan) -> Payment {
        SubmitPaymentHandler::new(self.users.clone(), self.store(), self.notifier.clone())
            .handle(SubmitPaymentCommand {
                uid: uid.clone(),
                submission: PaymentSubmission {
                    plan_requested: plan,
                    channel: PaymentChannel::Moncash,
                    bank_name: None,
                    amount: Money::new(250_000, Currency::Htg).unwrap(),
                    billing_month: BillingMonth::parse("2026-03").unwrap(),
                    reference: "MC-884213".to_string(),
                },
                now: self.now(),
            })
            .await
            .unwrap()
    }

    fn review_handler(&self) -> ReviewPaymentHandler {
        ReviewPaymentHandler::new(
            self.store(),
            self.users.clone(),
            TeamPropagation::new(self.teams.clone(), self.users.clone()),
            self.notifier.clone(),
            self.policy,
        )
    }

    fn review_command(&self, payment_id: PaymentId, decision: ReviewDecision) -> ReviewPaymentCommand {
        ReviewPaymentCommand {
            payment_id,
            decision,
            note: None,
            reviewer_id: UserId::new("admin").unwrap(),
            now: self.now(),
        }
    }

    async fn approve(&self, payment_id: PaymentId) {
        self.review_handler()
            .handle(self.review_command(payment_id, ReviewDecision::Approved))
            .await
            .unwrap();
    }

    async fn download(
        &self,
        uid: &UserId,
        content: &str,
        resource: &str,
    ) -> Result<(), DownloadError> {
        RecordDownloadHandler::new(self.users.clone(), self.content.clone(), self.content.clone())
            .handle(RecordDownloadCommand {
                uid: uid.clone(),
                content_id: ContentId::new(content).unwrap(),
                resource_type: ResourceType::new(resource).unwrap(),
                now: self.now(),
            })
            .await
            .map(|_| ())
    }
}

// =============================================================================
// Individual Plan
// =============================================================================

#[tokio::test]
async fn approval_grants_standard_window_from_now() {
    let world = World::new();
    let ana = world.register("ana").await;

    let payment = world.submit(&ana, PaidPlan::Standard).await;
    assert_eq!(payment.status, PaymentStatus::Pending);

    AttachReceiptHandler::new(world.store())
        .handle(AttachReceiptCommand {
            payment_id: payment.id,
            uid: ana.clone(),
            receipt: Receipt::new("receipts/ana/mc-884213.jpg", "recu.jpg", "image/jpeg").unwrap(),
        })
        .await
        .unwrap();

    world.approve(payment.id).await;

    let account = world.account(&ana);
    let expected_expiry = world.now().plus_days(30);
    assert_eq!(account.plan, Plan::Standard);
    assert_eq!(account.plan_expires_at, Some(expected_expiry));
    assert_eq!(account.grace_until, Some(expected_expiry.plus_days(3)));
    assert_eq!(
        world.payments.get(&payment.id).unwrap().status,
        PaymentStatus::Approved
    );
}

#[tokio::test]
async fn early_renewal_stacks_on_remaining_time() {
    let world = World::new();
    let ana = world.register("ana").await;

    let first = world.submit(&ana, PaidPlan::Standard).await;
    world.approve(first.id).await;
    let first_expiry = world.account(&ana).plan_expires_at.unwrap();

    world.clock.advance_days(10);
    let second = world.submit(&ana, PaidPlan::Standard).await;
    world.approve(second.id).await;

    assert_eq!(
        world.account(&ana).plan_expires_at,
        Some(first_expiry.plus_days(30))
    );
}

#[tokio::test]
async fn second_review_is_refused_and_changes_nothing() {
    let world = World::new();
    let ana = world.register("ana").await;
    let payment = world.submit(&ana, PaidPlan::Standard).await;
    world.approve(payment.id).await;
    let after_first = world.account(&ana);

    world.clock.advance_days(1);
    let err = world
        .review_handler()
        .handle(world.review_command(payment.id, ReviewDecision::Rejected))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::AlreadyReviewed);
    assert_eq!(world.account(&ana), after_first);
    assert_eq!(
        world.payments.get(&payment.id).unwrap().status,
        PaymentStatus::Approved
    );
}

#[tokio::test]
async fn rejection_leaves_entitlement_untouched() {
    let world = World::new();
    let ana = world.register("ana").await;
    let payment = world.submit(&ana, PaidPlan::Standard).await;

    world
        .review_handler()
        .handle(ReviewPaymentCommand {
            note: Some("Reference introuvable".to_string()),
            ..world.review_command(payment.id, ReviewDecision::Rejected)
        })
        .await
        .unwrap();

    let account = world.account(&ana);
    assert_eq!(account.plan, Plan::Free);
    assert_eq!(account.plan_expires_at, None);
    assert_eq!(
        world.payments.get(&payment.id).unwrap().status,
        PaymentStatus::Rejected
    );
}

// =============================================================================
// Team Plan
// =============================================================================

#[tokio::test]
async fn team_renewal_reaches_every_member() {
    let world = World::new();
    let bob = world.register("bob").await;
    let carol = world.register("carol").await;

    let first = world.submit(&bob, PaidPlan::Team).await;
    world.approve(first.id).await;

    let team = CreateTeamHandler::new(
        world.teams.clone(),
        world.users.clone(),
        world.policy.max_team_members,
    )
    .handle(CreateTeamCommand {
        uid: bob.clone(),
        name: "Chorale Saint-Louis".to_string(),
        now: world.now(),
    })
    .await
    .unwrap();

    let invitation = InviteMemberHandler::new(
        world.teams.clone(),
        world.teams.clone(),
        world.policy.invitation_ttl_days,
    )
    .handle(InviteMemberCommand {
        team_id: team.id,
        inviter_uid: bob.clone(),
        email: "carol@kantik.ht".to_string(),
        role: TeamRole::Member,
        now: world.now(),
    })
    .await
    .unwrap();

    AcceptInvitationHandler::new(world.teams.clone(), world.teams.clone(), world.users.clone())
        .handle(AcceptInvitationCommand {
            invitation_id: invitation.id,
            uid: carol.clone(),
            now: world.now(),
        })
        .await
        .unwrap();

    let joined = world.account(&carol);
    assert_eq!(joined.plan, Plan::Team);
    assert_eq!(joined.team_id, Some(team.id));
    assert_eq!(joined.plan_expires_at, world.account(&bob).plan_expires_at);

    world.clock.advance_days(20);
    let renewal = world.submit(&bob, PaidPlan::Team).await;
    assert_eq!(renewal.team_id, Some(team.id));

    let result = world
        .review_handler()
        .handle(world.review_command(renewal.id, ReviewDecision::Approved))
        .await
        .unwrap();

    let report = result.propagation.unwrap();
    assert_eq!(report.updated, vec![carol.clone()]);
    assert!(report.failed.is_empty());

    let owner = world.account(&bob);
    let member = world.account(&carol);
    assert_eq!(member.plan_expires_at, owner.plan_expires_at);
    assert_eq!(member.grace_until, owner.grace_until);
    assert_eq!(owner.plan_expires_at, result.window.map(|w| w.expires_at));
}

// =============================================================================
// Downloads
// =============================================================================

#[tokio::test]
async fn downloads_follow_the_plan_tier() {
    let world = World::new();
    let ana = world.register("ana").await;

    let err = world.download(&ana, "misa-kreyol", "pdf").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let payment = world.submit(&ana, PaidPlan::Standard).await;
    world.approve(payment.id).await;

    world.download(&ana, "misa-kreyol", "pdf").await.unwrap();
    world.download(&ana, "misa-kreyol", "pdf").await.unwrap();
    let premium = world.download(&ana, "ave-maria", "pdf").await.unwrap_err();
    assert_eq!(premium.code(), ErrorCode::Forbidden);

    let library = GetLibraryHandler::new(world.content.clone())
        .handle(GetLibraryQuery { uid: ana.clone() })
        .await
        .unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library[0].download_count, 2);
    assert_eq!(
        world
            .content
            .downloads_count(&ContentId::new("misa-kreyol").unwrap()),
        2
    );
}

#[tokio::test]
async fn grace_period_keeps_downloads_then_expires() {
    let world = World::new();
    let ana = world.register("ana").await;
    let payment = world.submit(&ana, PaidPlan::Standard).await;
    world.approve(payment.id).await;

    world.clock.advance_days(31);
    let view = GetEntitlementHandler::new(world.users.clone())
        .handle(GetEntitlementQuery {
            uid: ana.clone(),
            now: world.now(),
        })
        .await
        .unwrap();
    assert!(view.is_active);
    assert!(view.in_grace_period);
    world.download(&ana, "misa-kreyol", "pdf").await.unwrap();

    world.clock.advance_days(3);
    let err = world.download(&ana, "misa-kreyol", "pdf").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
