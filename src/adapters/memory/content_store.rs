//! In-memory content catalog and download log.
//!
//! One store implements both `ContentCatalog` and `DownloadRepository`
//! because the download counter lives on the content entity: appending the
//! record and bumping the counter happen under the same lock.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::download::{ContentSummary, DownloadRecord, ResourceDescriptor, ResourceType};
use crate::domain::entitlement::AccessTier;
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, UserId};
use crate::ports::{ContentCatalog, DownloadRepository};

struct ContentEntry {
    summary: ContentSummary,
    active: bool,
}

#[derive(Default)]
struct ContentState {
    contents: HashMap<ContentId, ContentEntry>,
    resources: Vec<ResourceDescriptor>,
    downloads: Vec<DownloadRecord>,
}

#[derive(Default)]
pub struct InMemoryContentStore {
    state: Mutex<ContentState>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an active content entity with a zero counter.
    pub fn with_content(self, id: &str, title: &str, tier: AccessTier) -> Self {
        self.insert_content(id, title, tier, true);
        self
    }

    /// Seeds a content entity hidden from the catalog.
    pub fn with_inactive_content(self, id: &str, title: &str, tier: AccessTier) -> Self {
        self.insert_content(id, title, tier, false);
        self
    }

    /// Seeds a resource variant of an existing content id.
    pub fn with_resource(self, content_id: &str, resource_type: &str, filename: &str) -> Self {
        if let (Ok(content_id), Ok(resource_type)) =
            (ContentId::new(content_id), ResourceType::new(resource_type))
        {
            let blob_ref = format!("blob://{}/{}", content_id, resource_type);
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .resources
                .push(ResourceDescriptor {
                    content_id,
                    resource_type,
                    blob_ref,
                    filename: filename.to_string(),
                    content_type: "application/octet-stream".to_string(),
                });
        }
        self
    }

    /// Current download counter of a content id (0 if unknown).
    pub fn downloads_count(&self, id: &ContentId) -> i64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contents
            .get(id)
            .map_or(0, |c| c.summary.downloads_count)
    }

    fn insert_content(&self, id: &str, title: &str, tier: AccessTier, active: bool) {
        if let Ok(id) = ContentId::new(id) {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contents
                .insert(
                    id.clone(),
                    ContentEntry {
                        summary: ContentSummary {
                            id,
                            title: title.to_string(),
                            access_tier: tier,
                            downloads_count: 0,
                        },
                        active,
                    },
                );
        }
    }
}

#[async_trait]
impl ContentCatalog for InMemoryContentStore {
    async fn find_content(&self, id: &ContentId) -> Result<Option<ContentSummary>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .contents
            .get(id)
            .filter(|c| c.active)
            .map(|c| c.summary.clone()))
    }

    async fn find_resource(
        &self,
        content_id: &ContentId,
        resource_type: &ResourceType,
    ) -> Result<Option<ResourceDescriptor>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .resources
            .iter()
            .find(|r| &r.content_id == content_id && &r.resource_type == resource_type)
            .cloned())
    }
}

#[async_trait]
impl DownloadRepository for InMemoryContentStore {
    async fn record(&self, record: &DownloadRecord) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = state.contents.get_mut(&record.content_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ContentNotFound,
                format!("Content not found: {}", record.content_id),
            )
        })?;
        entry.summary.downloads_count += 1;
        state.downloads.push(record.clone());
        Ok(())
    }

    async fn list_by_user(&self, uid: &UserId) -> Result<Vec<DownloadRecord>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<_> = state
            .downloads
            .iter()
            .filter(|d| &d.uid == uid)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.downloads.len() as u64)
    }
}
