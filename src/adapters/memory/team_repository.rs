//! In-memory team and invitation repository.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::{DomainError, ErrorCode, InvitationId, TeamId, UserId};
use crate::domain::team::{InvitationStatus, Team, TeamInvitation, TeamMembership};
use crate::ports::{AddMemberOutcome, InvitationRepository, TeamRepository};

#[derive(Default)]
struct TeamState {
    teams: Vec<Team>,
    members: Vec<TeamMembership>,
    invitations: Vec<TeamInvitation>,
}

/// Teams, memberships and invitations behind a single lock, so the
/// capacity check and the insert in `add_member` cannot interleave.
#[derive(Default)]
pub struct InMemoryTeamRepository {
    state: Mutex<TeamState>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a team with its members (owner included).
    pub fn with_team(self, team: Team, members: Vec<TeamMembership>) -> Self {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.teams.push(team);
            state.members.extend(members);
        }
        self
    }

    pub fn member_count(&self, team_id: &TeamId) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .members
            .iter()
            .filter(|m| &m.team_id == team_id)
            .count()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, team: &Team, owner: &TeamMembership) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.teams.iter().any(|t| t.owner_uid == team.owner_uid) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "User already owns a team",
            ));
        }
        if state.members.iter().any(|m| m.uid == owner.uid) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "User already belongs to a team",
            ));
        }
        state.teams.push(team.clone());
        state.members.push(owner.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.teams.iter().find(|t| &t.id == id).cloned())
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMembership>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut members: Vec<_> = state
            .members
            .iter()
            .filter(|m| &m.team_id == team_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(members)
    }

    async fn find_member(
        &self,
        team_id: &TeamId,
        uid: &UserId,
    ) -> Result<Option<TeamMembership>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .members
            .iter()
            .find(|m| &m.team_id == team_id && &m.uid == uid)
            .cloned())
    }

    async fn add_member(
        &self,
        membership: &TeamMembership,
        max_members: u32,
    ) -> Result<AddMemberOutcome, DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.members.iter().any(|m| m.uid == membership.uid) {
            return Ok(AddMemberOutcome::AlreadyInTeam);
        }
        let seated = state
            .members
            .iter()
            .filter(|m| m.team_id == membership.team_id)
            .count();
        if seated as u32 >= max_members {
            return Ok(AddMemberOutcome::CapacityExceeded);
        }
        state.members.push(membership.clone());
        Ok(AddMemberOutcome::Added)
    }

    async fn remove_member(&self, team_id: &TeamId, uid: &UserId) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let before = state.members.len();
        state
            .members
            .retain(|m| !(&m.team_id == team_id && &m.uid == uid));
        Ok(state.members.len() < before)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.teams.len() as u64)
    }
}

#[async_trait]
impl InvitationRepository for InMemoryTeamRepository {
    async fn insert(&self, invitation: &TeamInvitation) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.invitations.push(invitation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<TeamInvitation>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.invitations.iter().find(|i| &i.id == id).cloned())
    }

    async fn mark_accepted(&self, id: &InvitationId) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state
            .invitations
            .iter_mut()
            .find(|i| &i.id == id && i.status == InvitationStatus::Pending)
        {
            Some(invitation) => {
                invitation.status = InvitationStatus::Accepted;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::team::TeamRole;

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2026-02-02T00:00:00Z").unwrap()
    }

    fn team() -> Team {
        Team::create(TeamId::new(), "Choir", UserId::new("owner").unwrap(), 3, now()).unwrap()
    }

    fn member(team: &Team, uid: &str) -> TeamMembership {
        TeamMembership::new(
            team.id,
            UserId::new(uid).unwrap(),
            format!("{uid}@kantik.ht"),
            TeamRole::Member,
            now(),
        )
    }

    #[tokio::test]
    async fn add_member_enforces_capacity() {
        let team = team();
        let repo = InMemoryTeamRepository::new();
        repo.create(&team, &team.owner_membership("owner@kantik.ht"))
            .await
            .unwrap();

        assert_eq!(repo.add_member(&member(&team, "a"), 3).await.unwrap(), AddMemberOutcome::Added);
        assert_eq!(repo.add_member(&member(&team, "b"), 3).await.unwrap(), AddMemberOutcome::Added);
        assert_eq!(
            repo.add_member(&member(&team, "c"), 3).await.unwrap(),
            AddMemberOutcome::CapacityExceeded
        );
        assert_eq!(repo.member_count(&team.id), 3);
    }

    #[tokio::test]
    async fn add_member_detects_duplicates() {
        let team = team();
        let repo = InMemoryTeamRepository::new();
        repo.create(&team, &team.owner_membership("owner@kantik.ht"))
            .await
            .unwrap();
        repo.add_member(&member(&team, "a"), 7).await.unwrap();

        assert_eq!(
            repo.add_member(&member(&team, "a"), 7).await.unwrap(),
            AddMemberOutcome::AlreadyInTeam
        );
    }

    #[tokio::test]
    async fn seat_in_one_team_blocks_joining_another() {
        let choir = team();
        let band = Team::create(TeamId::new(), "Band", UserId::new("lead").unwrap(), 3, now()).unwrap();
        let repo = InMemoryTeamRepository::new();
        repo.create(&choir, &choir.owner_membership("owner@kantik.ht"))
            .await
            .unwrap();
        repo.create(&band, &band.owner_membership("lead@kantik.ht"))
            .await
            .unwrap();
        repo.add_member(&member(&choir, "a"), 7).await.unwrap();

        assert_eq!(
            repo.add_member(&member(&band, "a"), 7).await.unwrap(),
            AddMemberOutcome::AlreadyInTeam
        );
        assert_eq!(repo.member_count(&band.id), 1);
    }

    #[tokio::test]
    async fn owner_cannot_create_second_team() {
        let first = team();
        let second = team();
        let repo = InMemoryTeamRepository::new();
        repo.create(&first, &first.owner_membership("o@kantik.ht")).await.unwrap();

        let err = repo
            .create(&second, &second.owner_membership("o@kantik.ht"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn mark_accepted_only_once() {
        let team = team();
        let repo = InMemoryTeamRepository::new();
        let invitation = TeamInvitation::issue(
            team.id,
            "new@kantik.ht",
            TeamRole::Member,
            team.owner_uid.clone(),
            7,
            now(),
        )
        .unwrap();
        InvitationRepository::insert(&repo, &invitation).await.unwrap();

        assert!(repo.mark_accepted(&invitation.id).await.unwrap());
        assert!(!repo.mark_accepted(&invitation.id).await.unwrap());
    }
}
