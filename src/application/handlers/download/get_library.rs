//! GetLibraryHandler - distinct contents a user has downloaded.

use std::sync::Arc;

use crate::domain::download::{build_library, DownloadError, LibraryEntry};
use crate::domain::foundation::UserId;
use crate::ports::DownloadRepository;

#[derive(Debug, Clone)]
pub struct GetLibraryQuery {
    pub uid: UserId,
}

pub struct GetLibraryHandler {
    downloads: Arc<dyn DownloadRepository>,
}

impl GetLibraryHandler {
    pub fn new(downloads: Arc<dyn DownloadRepository>) -> Self {
        Self { downloads }
    }

    pub async fn handle(&self, query: GetLibraryQuery) -> Result<Vec<LibraryEntry>, DownloadError> {
        let records = self.downloads.list_by_user(&query.uid).await?;
        Ok(build_library(&records))
    }
}
