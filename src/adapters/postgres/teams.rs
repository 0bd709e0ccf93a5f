//! PostgreSQL implementation of TeamRepository and InvitationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, parse_column, parse_user_id};
use crate::domain::foundation::{
    DomainError, ErrorCode, InvitationId, TeamId, TeamMembershipId, Timestamp, UserId,
};
use crate::domain::team::{Team, TeamInvitation, TeamMembership};
use crate::ports::{AddMemberOutcome, InvitationRepository, TeamRepository};

pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    owner_uid: String,
    max_members: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = DomainError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: TeamId::from_uuid(row.id),
            name: row.name,
            owner_uid: parse_user_id(row.owner_uid)?,
            max_members: u32::try_from(row.max_members).map_err(|_| {
                DomainError::database(format!("Invalid max_members: {}", row.max_members))
            })?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    team_id: Uuid,
    uid: String,
    email: String,
    role: String,
    joined_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for TeamMembership {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(TeamMembership {
            id: TeamMembershipId::from_uuid(row.id),
            team_id: TeamId::from_uuid(row.team_id),
            uid: parse_user_id(row.uid)?,
            email: row.email,
            role: parse_column(&row.role)?,
            joined_at: Timestamp::from_datetime(row.joined_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvitationRow {
    id: Uuid,
    team_id: Uuid,
    email: String,
    role: String,
    invited_by: String,
    status: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<InvitationRow> for TeamInvitation {
    type Error = DomainError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        Ok(TeamInvitation {
            id: InvitationId::from_uuid(row.id),
            team_id: TeamId::from_uuid(row.team_id),
            email: row.email,
            role: parse_column(&row.role)?,
            invited_by: parse_user_id(row.invited_by)?,
            status: parse_column(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            expires_at: Timestamp::from_datetime(row.expires_at),
        })
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, team: &Team, owner: &TeamMembership) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, owner_uid, max_members, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(team.id.as_uuid())
        .bind(&team.name)
        .bind(team.owner_uid.as_str())
        .bind(i32::try_from(team.max_members).unwrap_or(i32::MAX))
        .bind(team.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("teams_owner_uid_key") {
                    return DomainError::new(ErrorCode::Conflict, "User already owns a team");
                }
            }
            db_error("insert team", e)
        })?;

        insert_member(&mut tx, owner).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit team", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row: Option<TeamRow> = sqlx::query_as(
            "SELECT id, name, owner_uid, max_members, created_at FROM teams WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find team", e))?;

        row.map(Team::try_from).transpose()
    }

    async fn list_members(&self, team_id: &TeamId) -> Result<Vec<TeamMembership>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT id, team_id, uid, email, role, joined_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list team members", e))?;

        rows.into_iter().map(TeamMembership::try_from).collect()
    }

    async fn find_member(
        &self,
        team_id: &TeamId,
        uid: &UserId,
    ) -> Result<Option<TeamMembership>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT id, team_id, uid, email, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND uid = $2
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find team member", e))?;

        row.map(TeamMembership::try_from).transpose()
    }

    async fn add_member(
        &self,
        membership: &TeamMembership,
        max_members: u32,
    ) -> Result<AddMemberOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        // Row lock on the team serializes concurrent joins.
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
            .bind(membership.team_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("lock team", e))?;

        if locked.is_none() {
            return Err(DomainError::new(
                ErrorCode::TeamNotFound,
                format!("Team not found: {}", membership.team_id),
            ));
        }

        let seated: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM team_members WHERE uid = $1")
            .bind(membership.uid.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("find team member", e))?;

        if seated.is_some() {
            return Ok(AddMemberOutcome::AlreadyInTeam);
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
            .bind(membership.team_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error("count team members", e))?;

        if count >= i64::from(max_members) {
            return Ok(AddMemberOutcome::CapacityExceeded);
        }

        // Another team's lock does not cover this uid; the unique index does.
        match insert_member(&mut tx, membership).await {
            Err(e) if e.code == ErrorCode::Conflict => return Ok(AddMemberOutcome::AlreadyInTeam),
            other => other?,
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit team member", e))?;

        Ok(AddMemberOutcome::Added)
    }

    async fn remove_member(&self, team_id: &TeamId, uid: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND uid = $2")
            .bind(team_id.as_uuid())
            .bind(uid.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("remove team member", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count teams", e))?;

        Ok(count.max(0) as u64)
    }
}

async fn insert_member(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    membership: &TeamMembership,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO team_members (id, team_id, uid, email, role, joined_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(membership.id.as_uuid())
    .bind(membership.team_id.as_uuid())
    .bind(membership.uid.as_str())
    .bind(&membership.email)
    .bind(membership.role.as_str())
    .bind(membership.joined_at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.constraint() == Some("team_members_uid_key") {
                return DomainError::new(ErrorCode::Conflict, "User already belongs to a team");
            }
        }
        db_error("insert team member", e)
    })?;

    Ok(())
}

#[async_trait]
impl InvitationRepository for PostgresTeamRepository {
    async fn insert(&self, invitation: &TeamInvitation) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO team_invitations (
                id, team_id, email, role, invited_by, status, created_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invitation.id.as_uuid())
        .bind(invitation.team_id.as_uuid())
        .bind(&invitation.email)
        .bind(invitation.role.as_str())
        .bind(invitation.invited_by.as_str())
        .bind(invitation.status.as_str())
        .bind(invitation.created_at.as_datetime())
        .bind(invitation.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert invitation", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<TeamInvitation>, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, team_id, email, role, invited_by, status, created_at, expires_at
            FROM team_invitations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find invitation", e))?;

        row.map(TeamInvitation::try_from).transpose()
    }

    async fn mark_accepted(&self, id: &InvitationId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE team_invitations SET status = 'ACCEPTED' WHERE id = $1 AND status = 'PENDING'",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("accept invitation", e))?;

        Ok(result.rows_affected() > 0)
    }
}
