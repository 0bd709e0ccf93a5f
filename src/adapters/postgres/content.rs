//! PostgreSQL implementation of ContentCatalog and DownloadRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, parse_column, parse_user_id};
use crate::domain::download::{ContentSummary, DownloadRecord, ResourceDescriptor, ResourceType};
use crate::domain::foundation::{ContentId, DomainError, DownloadId, ErrorCode, Timestamp, UserId};
use crate::ports::{ContentCatalog, DownloadRepository};

pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: String,
    title: String,
    access_tier: String,
    downloads_count: i64,
}

impl TryFrom<ContentRow> for ContentSummary {
    type Error = DomainError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(ContentSummary {
            id: parse_content_id(row.id)?,
            title: row.title,
            access_tier: parse_column(&row.access_tier)?,
            downloads_count: row.downloads_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResourceRow {
    content_id: String,
    resource_type: String,
    blob_ref: String,
    filename: String,
    content_type: String,
}

impl TryFrom<ResourceRow> for ResourceDescriptor {
    type Error = DomainError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        Ok(ResourceDescriptor {
            content_id: parse_content_id(row.content_id)?,
            resource_type: parse_resource_type(&row.resource_type)?,
            blob_ref: row.blob_ref,
            filename: row.filename,
            content_type: row.content_type,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DownloadRow {
    id: Uuid,
    uid: String,
    content_id: String,
    resource_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<DownloadRow> for DownloadRecord {
    type Error = DomainError;

    fn try_from(row: DownloadRow) -> Result<Self, Self::Error> {
        Ok(DownloadRecord {
            id: DownloadId::from_uuid(row.id),
            uid: parse_user_id(row.uid)?,
            content_id: parse_content_id(row.content_id)?,
            resource_type: parse_resource_type(&row.resource_type)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_content_id(value: String) -> Result<ContentId, DomainError> {
    ContentId::new(value).map_err(|e| DomainError::database(format!("Invalid content id: {}", e)))
}

fn parse_resource_type(value: &str) -> Result<ResourceType, DomainError> {
    ResourceType::new(value)
        .map_err(|e| DomainError::database(format!("Invalid resource type: {}", e)))
}

#[async_trait]
impl ContentCatalog for PostgresContentRepository {
    async fn find_content(&self, id: &ContentId) -> Result<Option<ContentSummary>, DomainError> {
        let row: Option<ContentRow> = sqlx::query_as(
            r#"
            SELECT id, title, access_tier, downloads_count
            FROM contents
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find content", e))?;

        row.map(ContentSummary::try_from).transpose()
    }

    async fn find_resource(
        &self,
        content_id: &ContentId,
        resource_type: &ResourceType,
    ) -> Result<Option<ResourceDescriptor>, DomainError> {
        let row: Option<ResourceRow> = sqlx::query_as(
            r#"
            SELECT content_id, resource_type, blob_ref, filename, content_type
            FROM content_resources
            WHERE content_id = $1 AND resource_type = $2
            "#,
        )
        .bind(content_id.as_str())
        .bind(resource_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find resource", e))?;

        row.map(ResourceDescriptor::try_from).transpose()
    }
}

#[async_trait]
impl DownloadRepository for PostgresContentRepository {
    async fn record(&self, record: &DownloadRecord) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let updated = sqlx::query(
            "UPDATE contents SET downloads_count = downloads_count + 1 WHERE id = $1",
        )
        .bind(record.content_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("increment download counter", e))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ContentNotFound,
                format!("Content not found: {}", record.content_id),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO downloads (id, uid, content_id, resource_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.uid.as_str())
        .bind(record.content_id.as_str())
        .bind(record.resource_type.as_str())
        .bind(record.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("insert download", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit download", e))?;

        Ok(())
    }

    async fn list_by_user(&self, uid: &UserId) -> Result<Vec<DownloadRecord>, DomainError> {
        let rows: Vec<DownloadRow> = sqlx::query_as(
            r#"
            SELECT id, uid, content_id, resource_type, created_at
            FROM downloads
            WHERE uid = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(uid.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list downloads", e))?;

        rows.into_iter().map(DownloadRecord::try_from).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM downloads")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count downloads", e))?;

        Ok(count.max(0) as u64)
    }
}
