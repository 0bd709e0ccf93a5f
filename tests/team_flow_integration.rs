//! Integration tests for team seats and concurrent account writes.
//!
//! 1. A default-policy team holds seven seats; the eighth invite and a
//!    late acceptance are both refused
//! 2. An approval that commits while another handler is working on the
//!    same account survives that handler's write
//! 3. A renewal that lands between seating a joiner and copying the owner's
//!    window still reaches the joiner

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use kantik::adapters::memory::{InMemoryTeamRepository, InMemoryUserRepository};
use kantik::application::handlers::account::{ChangeRoleCommand, ChangeRoleHandler};
use kantik::application::handlers::team::{
    AcceptInvitationCommand, AcceptInvitationHandler, CreateTeamCommand, CreateTeamHandler,
    InviteMemberCommand, InviteMemberHandler,
};
use kantik::domain::entitlement::{
    AccountRole, EntitlementPolicy, EntitlementSnapshot, Plan, UserAccount,
};
use kantik::domain::foundation::{DomainError, InvitationId, TeamId, Timestamp, UserId};
use kantik::domain::team::{Team, TeamError, TeamInvitation, TeamMembership, TeamRole};
use kantik::ports::{AddMemberOutcome, PlanStats, TeamRepository, UserRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn now() -> Timestamp {
    Timestamp::parse_rfc3339("2026-04-01T15:00:00Z").unwrap()
}

fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

fn email(s: &str) -> String {
    format!("{s}@kantik.ht")
}

fn policy() -> EntitlementPolicy {
    EntitlementPolicy::default()
}

fn team_snapshot(expires_in_days: i64) -> EntitlementSnapshot {
    let window = policy().window_ending_at(now().plus_days(expires_in_days));
    EntitlementSnapshot {
        plan: Plan::Team,
        plan_expires_at: Some(window.expires_at),
        grace_until: Some(window.grace_until),
    }
}

async fn register(users: &InMemoryUserRepository, id: &str) {
    let account = UserAccount::register(uid(id), &email(id), now()).unwrap();
    users.insert(&account).await.unwrap();
}

async fn register_team_payer(users: &InMemoryUserRepository, id: &str, expires_in_days: i64) {
    register(users, id).await;
    users
        .apply_entitlement(&uid(id), &team_snapshot(expires_in_days), now())
        .await
        .unwrap();
}

/// Delegates to the in-memory store, but commits a pending entitlement
/// write right after the first read of its target account.
struct ApprovalDuringRead {
    inner: Arc<InMemoryUserRepository>,
    pending: Mutex<Option<(UserId, EntitlementSnapshot)>>,
}

impl ApprovalDuringRead {
    fn new(inner: Arc<InMemoryUserRepository>, target: &str, snapshot: EntitlementSnapshot) -> Self {
        Self {
            inner,
            pending: Mutex::new(Some((uid(target), snapshot))),
        }
    }

    fn take_pending_for(&self, id: &UserId) -> Option<EntitlementSnapshot> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.as_ref() {
            Some((target, _)) if target == id => pending.take().map(|(_, snapshot)| snapshot),
            _ => None,
        }
    }
}

#[async_trait]
impl UserRepository for ApprovalDuringRead {
    async fn insert(&self, account: &UserAccount) -> Result<(), DomainError> {
        self.inner.insert(account).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let read = self.inner.find_by_id(id).await?;
        if let Some(snapshot) = self.take_pending_for(id) {
            self.inner.apply_entitlement(id, &snapshot, now()).await?;
        }
        Ok(read)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        self.inner.find_by_email(email).await
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DomainError> {
        self.inner.list().await
    }

    async fn set_role(&self, id: &UserId, role: AccountRole, at: Timestamp) -> Result<(), DomainError> {
        self.inner.set_role(id, role, at).await
    }

    async fn set_team(
        &self,
        id: &UserId,
        team: Option<(TeamId, TeamRole)>,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        self.inner.set_team(id, team, at).await
    }

    async fn apply_entitlement(
        &self,
        id: &UserId,
        snapshot: &EntitlementSnapshot,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        self.inner.apply_entitlement(id, snapshot, at).await
    }

    async fn copy_entitlement(&self, from: &UserId, to: &UserId, at: Timestamp) -> Result<(), DomainError> {
        self.inner.copy_entitlement(from, to, at).await
    }

    async fn plan_stats(&self, at: Timestamp) -> Result<PlanStats, DomainError> {
        self.inner.plan_stats(at).await
    }
}

/// Delegates to the in-memory store. As soon as a seat is granted, renews
/// the owner and propagates to every seated member, the way a TEAM approval
/// finishing at that moment would.
struct RenewalAfterSeat {
    inner: Arc<InMemoryTeamRepository>,
    users: Arc<InMemoryUserRepository>,
    owner: UserId,
    renewed: EntitlementSnapshot,
}

#[async_trait]
impl TeamRepository for RenewalAfterSeat {
    async fn create(&self, team: &Team, owner: &TeamMembership) -> Result<(), DomainError> {
        self.inner.create(team, owner).await
    }

    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        TeamRepository::find_by_id(self.inner.as_ref(), id).await
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMembership>, DomainError> {
        self.inner.list_members(team_id).await
    }

    async fn find_member(
        &self,
        team_id: &TeamId,
        member: &UserId,
    ) -> Result<Option<TeamMembership>, DomainError> {
        self.inner.find_member(team_id, member).await
    }

    async fn add_member(
        &self,
        membership: &TeamMembership,
        max_members: u32,
    ) -> Result<AddMemberOutcome, DomainError> {
        let outcome = self.inner.add_member(membership, max_members).await?;
        if outcome == AddMemberOutcome::Added {
            self.users
                .apply_entitlement(&self.owner, &self.renewed, now())
                .await?;
            for member in self.inner.list_members(&membership.team_id).await? {
                self.users
                    .apply_entitlement(&member.uid, &self.renewed, now())
                    .await?;
            }
        }
        Ok(outcome)
    }

    async fn remove_member(&self, team_id: &TeamId, member: &UserId) -> Result<bool, DomainError> {
        self.inner.remove_member(team_id, member).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.inner.count().await
    }
}

struct Seats {
    users: Arc<InMemoryUserRepository>,
    teams: Arc<InMemoryTeamRepository>,
    team: Team,
}

impl Seats {
    async fn open() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());
        register_team_payer(&users, "owner", 30).await;

        let team = CreateTeamHandler::new(teams.clone(), users.clone(), policy().max_team_members)
            .handle(CreateTeamCommand {
                uid: uid("owner"),
                name: "Chorale Saint-Louis".to_string(),
                now: now(),
            })
            .await
            .unwrap();

        Self { users, teams, team }
    }

    async fn invite(&self, who: &str) -> Result<TeamInvitation, TeamError> {
        InviteMemberHandler::new(self.teams.clone(), self.teams.clone(), policy().invitation_ttl_days)
            .handle(InviteMemberCommand {
                team_id: self.team.id,
                inviter_uid: uid("owner"),
                email: email(who),
                role: TeamRole::Member,
                now: now(),
            })
            .await
    }

    async fn accept(&self, invitation: InvitationId, who: &str) -> Result<TeamMembership, TeamError> {
        AcceptInvitationHandler::new(self.teams.clone(), self.teams.clone(), self.users.clone())
            .handle(AcceptInvitationCommand {
                invitation_id: invitation,
                uid: uid(who),
                now: now(),
            })
            .await
    }

    async fn join(&self, who: &str) {
        register(&self.users, who).await;
        let invitation = self.invite(who).await.unwrap();
        self.accept(invitation.id, who).await.unwrap();
    }
}

// =============================================================================
// Team Capacity
// =============================================================================

#[tokio::test]
async fn default_team_refuses_the_eighth_member() {
    assert_eq!(policy().max_team_members, 7);
    let seats = Seats::open().await;
    for who in ["m1", "m2", "m3", "m4", "m5"] {
        seats.join(who).await;
    }

    register(&seats.users, "late").await;
    let late = seats.invite("late").await.unwrap();
    seats.join("m6").await;
    assert_eq!(seats.teams.member_count(&seats.team.id), 7);

    let invite_err = seats.invite("eighth").await.unwrap_err();
    assert!(matches!(
        invite_err,
        TeamError::CapacityExceeded { max_members: 7, .. }
    ));

    let accept_err = seats.accept(late.id, "late").await.unwrap_err();
    assert!(matches!(
        accept_err,
        TeamError::CapacityExceeded { max_members: 7, .. }
    ));
    assert_eq!(seats.teams.member_count(&seats.team.id), 7);
    let refused = seats.users.get(&uid("late")).unwrap();
    assert_eq!(refused.plan, Plan::Free);
    assert_eq!(refused.team_id, None);
}

#[tokio::test]
async fn member_of_one_team_cannot_take_a_seat_in_another() {
    let seats = Seats::open().await;
    seats.join("m1").await;

    register_team_payer(&seats.users, "rival", 30).await;
    let rival_team = CreateTeamHandler::new(seats.teams.clone(), seats.users.clone(), 7)
        .handle(CreateTeamCommand {
            uid: uid("rival"),
            name: "Band".to_string(),
            now: now(),
        })
        .await
        .unwrap();
    let invitation = InviteMemberHandler::new(seats.teams.clone(), seats.teams.clone(), 7)
        .handle(InviteMemberCommand {
            team_id: rival_team.id,
            inviter_uid: uid("rival"),
            email: email("m1"),
            role: TeamRole::Member,
            now: now(),
        })
        .await
        .unwrap();

    let err = seats.accept(invitation.id, "m1").await.unwrap_err();

    assert!(matches!(err, TeamError::Conflict(_)));
    assert_eq!(seats.teams.member_count(&rival_team.id), 1);
    assert_eq!(seats.users.get(&uid("m1")).unwrap().team_id, Some(seats.team.id));
}

// =============================================================================
// Concurrent Account Writes
// =============================================================================

#[tokio::test]
async fn approval_during_promotion_is_kept() {
    let store = Arc::new(InMemoryUserRepository::new());
    register(&store, "root").await;
    store.set_role(&uid("root"), AccountRole::Admin, now()).await.unwrap();
    register(&store, "eli").await;

    let approved = team_snapshot(30);
    let users = Arc::new(ApprovalDuringRead::new(store.clone(), "eli", approved));

    let returned = ChangeRoleHandler::new(users)
        .handle(ChangeRoleCommand {
            actor_uid: uid("root"),
            target_uid: uid("eli"),
            role: AccountRole::Admin,
            now: now(),
        })
        .await
        .unwrap();

    let stored = store.get(&uid("eli")).unwrap();
    assert!(stored.is_admin());
    assert_eq!(stored.entitlement(), approved);
    assert_eq!(returned.entitlement(), approved);
}

#[tokio::test]
async fn renewal_during_team_creation_is_kept() {
    let store = Arc::new(InMemoryUserRepository::new());
    register_team_payer(&store, "lead", 5).await;

    let renewed = team_snapshot(35);
    let users = Arc::new(ApprovalDuringRead::new(store.clone(), "lead", renewed));

    let team = CreateTeamHandler::new(Arc::new(InMemoryTeamRepository::new()), users, 7)
        .handle(CreateTeamCommand {
            uid: uid("lead"),
            name: "Choir".to_string(),
            now: now(),
        })
        .await
        .unwrap();

    let stored = store.get(&uid("lead")).unwrap();
    assert_eq!(stored.team_id, Some(team.id));
    assert_eq!(stored.role_in_team, Some(TeamRole::Owner));
    assert_eq!(stored.entitlement(), renewed);
}

#[tokio::test]
async fn renewal_right_after_seating_reaches_the_joiner() {
    let seats = Seats::open().await;
    register(&seats.users, "guest").await;
    let invitation = seats.invite("guest").await.unwrap();

    let renewed = team_snapshot(60);
    let teams = Arc::new(RenewalAfterSeat {
        inner: seats.teams.clone(),
        users: seats.users.clone(),
        owner: uid("owner"),
        renewed,
    });

    AcceptInvitationHandler::new(teams, seats.teams.clone(), seats.users.clone())
        .handle(AcceptInvitationCommand {
            invitation_id: invitation.id,
            uid: uid("guest"),
            now: now(),
        })
        .await
        .unwrap();

    let guest = seats.users.get(&uid("guest")).unwrap();
    assert_eq!(guest.entitlement(), renewed);
    assert_eq!(guest.team_id, Some(seats.team.id));
    assert_eq!(seats.users.get(&uid("owner")).unwrap().entitlement(), renewed);
}
