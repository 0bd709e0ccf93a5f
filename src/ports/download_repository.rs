//! Download accounting port.

use async_trait::async_trait;

use crate::domain::download::DownloadRecord;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait DownloadRepository: Send + Sync {
    /// Append the record and increment the content's download counter by
    /// one, as a single unit. Either both happen or neither does.
    async fn record(&self, record: &DownloadRecord) -> Result<(), DomainError>;

    /// Downloads by `uid`, oldest first.
    async fn list_by_user(&self, uid: &UserId) -> Result<Vec<DownloadRecord>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
