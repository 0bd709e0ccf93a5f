//! Content catalog port.
//!
//! The catalog owns content entities and their resource variants; the
//! download flow only reads from it.

use async_trait::async_trait;

use crate::domain::download::{ContentSummary, ResourceDescriptor, ResourceType};
use crate::domain::foundation::{ContentId, DomainError};

#[async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Active content by id. Inactive content is reported as `None`.
    async fn find_content(&self, id: &ContentId) -> Result<Option<ContentSummary>, DomainError>;

    async fn find_resource(
        &self,
        content_id: &ContentId,
        resource_type: &ResourceType,
    ) -> Result<Option<ResourceDescriptor>, DomainError>;
}
