//! RecordDownloadHandler - gatekeeper and accountant for resource downloads.
//!
//! Order of checks: content exists, plan covers its tier, resource variant
//! exists. Only then is the download recorded and the counter bumped.

use std::sync::Arc;

use crate::domain::download::{DownloadError, DownloadRecord, ResourceDescriptor, ResourceType};
use crate::domain::entitlement::can_download;
use crate::domain::foundation::{ContentId, Timestamp, UserId};
use crate::ports::{ContentCatalog, DownloadRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct RecordDownloadCommand {
    pub uid: UserId,
    pub content_id: ContentId,
    pub resource_type: ResourceType,
    pub now: Timestamp,
}

pub struct RecordDownloadHandler {
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn ContentCatalog>,
    downloads: Arc<dyn DownloadRepository>,
}

impl RecordDownloadHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        catalog: Arc<dyn ContentCatalog>,
        downloads: Arc<dyn DownloadRepository>,
    ) -> Self {
        Self {
            users,
            catalog,
            downloads,
        }
    }

    /// Returns where to fetch the bytes from.
    ///
    /// Nothing is written unless every check passes.
    pub async fn handle(
        &self,
        cmd: RecordDownloadCommand,
    ) -> Result<ResourceDescriptor, DownloadError> {
        let account = self
            .users
            .find_by_id(&cmd.uid)
            .await?
            .ok_or_else(|| DownloadError::user_not_found(cmd.uid.clone()))?;

        let content = self
            .catalog
            .find_content(&cmd.content_id)
            .await?
            .ok_or_else(|| DownloadError::content_not_found(cmd.content_id.clone()))?;

        if !can_download(&account.entitlement(), content.access_tier, cmd.now) {
            tracing::debug!(
                uid = %account.id,
                content_id = %content.id,
                plan = %account.plan,
                "Download refused by plan"
            );
            return Err(DownloadError::forbidden(
                "Your plan does not include this content",
            ));
        }

        let resource = self
            .catalog
            .find_resource(&content.id, &cmd.resource_type)
            .await?
            .ok_or_else(|| {
                DownloadError::resource_not_found(content.id.clone(), cmd.resource_type.as_str())
            })?;

        let record = DownloadRecord::new(
            account.id,
            content.id,
            cmd.resource_type,
            cmd.now,
        );
        self.downloads.record(&record).await?;

        tracing::info!(
            download_id = %record.id,
            uid = %record.uid,
            content_id = %record.content_id,
            resource_type = %record.resource_type,
            "Download recorded"
        );
        Ok(resource)
    }
}
