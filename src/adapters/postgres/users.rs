//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, parse_column, parse_user_id};
use crate::domain::entitlement::{AccountRole, EntitlementSnapshot, Plan, UserAccount};
use crate::domain::foundation::{DomainError, ErrorCode, TeamId, Timestamp, UserId};
use crate::domain::team::TeamRole;
use crate::ports::{PlanStats, UserRepository};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    role: String,
    plan: String,
    plan_expires_at: Option<DateTime<Utc>>,
    grace_until: Option<DateTime<Utc>>,
    team_id: Option<Uuid>,
    role_in_team: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role_in_team = row
            .role_in_team
            .as_deref()
            .map(parse_column)
            .transpose()?;

        Ok(UserAccount {
            id: parse_user_id(row.id)?,
            email: row.email,
            role: parse_column(&row.role)?,
            plan: parse_column(&row.plan)?,
            plan_expires_at: row.plan_expires_at.map(Timestamp::from_datetime),
            grace_until: row.grace_until.map(Timestamp::from_datetime),
            team_id: row.team_id.map(TeamId::from_uuid),
            role_in_team,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn ensure_found(rows_affected: u64, id: &UserId) -> Result<(), DomainError> {
    if rows_affected == 0 {
        return Err(DomainError::new(
            ErrorCode::UserNotFound,
            format!("User not found: {}", id),
        ));
    }
    Ok(())
}

const SELECT_USER: &str = r#"
    SELECT id, email, role, plan, plan_expires_at, grace_until,
           team_id, role_in_team, created_at, updated_at
    FROM users
"#;

#[derive(Debug, sqlx::FromRow)]
struct PlanStatsRow {
    total_users: i64,
    standard_users: i64,
    team_users: i64,
    active_standard: i64,
    active_team: i64,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, role, plan, plan_expires_at, grace_until,
                team_id, role_in_team, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.email)
        .bind(account.role.as_str())
        .bind(account.plan.as_str())
        .bind(account.plan_expires_at.map(|t| *t.as_datetime()))
        .bind(account.grace_until.map(|t| *t.as_datetime()))
        .bind(account.team_id.map(|t| *t.as_uuid()))
        .bind(account.role_in_team.map(|r| r.as_str()))
        .bind(account.created_at.as_datetime())
        .bind(account.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if matches!(
                    db_err.constraint(),
                    Some("users_pkey") | Some("users_email_key")
                ) {
                    return DomainError::new(ErrorCode::Conflict, "Account already registered");
                }
            }
            db_error("insert user", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user", e))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find user by email", e))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("{SELECT_USER} ORDER BY created_at, id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list users", e))?;

        rows.into_iter().map(UserAccount::try_from).collect()
    }

    async fn set_role(
        &self,
        id: &UserId,
        role: AccountRole,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_str())
            .bind(role.as_str())
            .bind(now.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("set user role", e))?;

        ensure_found(result.rows_affected(), id)
    }

    async fn set_team(
        &self,
        id: &UserId,
        team: Option<(TeamId, TeamRole)>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET team_id = $2, role_in_team = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(team.map(|(team_id, _)| *team_id.as_uuid()))
        .bind(team.map(|(_, role)| role.as_str()))
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("set user team", e))?;

        ensure_found(result.rows_affected(), id)
    }

    async fn apply_entitlement(
        &self,
        id: &UserId,
        snapshot: &EntitlementSnapshot,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let (expires_at, grace_until) = if snapshot.plan == Plan::Free {
            (None, None)
        } else {
            (
                snapshot.plan_expires_at.map(|t| *t.as_datetime()),
                snapshot.grace_until.map(|t| *t.as_datetime()),
            )
        };

        let result = sqlx::query(
            r#"
            UPDATE users SET
                plan = $2,
                plan_expires_at = $3,
                grace_until = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(snapshot.plan.as_str())
        .bind(expires_at)
        .bind(grace_until)
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("apply entitlement", e))?;

        ensure_found(result.rows_affected(), id)
    }

    async fn copy_entitlement(
        &self,
        from: &UserId,
        to: &UserId,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                plan = source.plan,
                plan_expires_at = source.plan_expires_at,
                grace_until = source.grace_until,
                updated_at = $3
            FROM users AS source
            WHERE users.id = $2 AND source.id = $1
            "#,
        )
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("copy entitlement", e))?;

        ensure_found(result.rows_affected(), to)
    }

    async fn plan_stats(&self, now: Timestamp) -> Result<PlanStats, DomainError> {
        let row: PlanStatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE plan = 'STANDARD') AS standard_users,
                COUNT(*) FILTER (WHERE plan = 'TEAM') AS team_users,
                COUNT(*) FILTER (
                    WHERE plan = 'STANDARD' AND (plan_expires_at >= $1 OR grace_until >= $1)
                ) AS active_standard,
                COUNT(*) FILTER (
                    WHERE plan = 'TEAM' AND (plan_expires_at >= $1 OR grace_until >= $1)
                ) AS active_team
            FROM users
            "#,
        )
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("compute plan stats", e))?;

        Ok(PlanStats {
            total_users: row.total_users.max(0) as u64,
            standard_users: row.standard_users.max(0) as u64,
            team_users: row.team_users.max(0) as u64,
            active_standard: row.active_standard.max(0) as u64,
            active_team: row.active_team.max(0) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UserRow {
        let now = Utc::now();
        UserRow {
            id: "uid-1".to_string(),
            email: "ana@kantik.ht".to_string(),
            role: "ADMIN".to_string(),
            plan: "TEAM".to_string(),
            plan_expires_at: Some(now),
            grace_until: Some(now),
            team_id: Some(Uuid::new_v4()),
            role_in_team: Some("MEMBER".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_account() {
        let account = UserAccount::try_from(row()).unwrap();
        assert_eq!(account.id.as_str(), "uid-1");
        assert_eq!(account.role, AccountRole::Admin);
        assert_eq!(account.plan, Plan::Team);
        assert_eq!(account.role_in_team, Some(TeamRole::Member));
    }

    #[test]
    fn unknown_plan_is_a_database_error() {
        let mut bad = row();
        bad.plan = "GOLD".to_string();
        let err = UserAccount::try_from(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
