//! Data Transfer Objects for download endpoints.

use serde::Serialize;

use crate::domain::download::{LibraryEntry, ResourceDescriptor};

/// Where to fetch an authorised resource from.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    pub content_id: String,
    pub resource_type: String,
    pub blob_ref: String,
    pub filename: String,
    pub content_type: String,
}

impl From<ResourceDescriptor> for DownloadResponse {
    fn from(r: ResourceDescriptor) -> Self {
        Self {
            content_id: r.content_id.to_string(),
            resource_type: r.resource_type.to_string(),
            blob_ref: r.blob_ref,
            filename: r.filename,
            content_type: r.content_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryResponse {
    pub entries: Vec<LibraryEntry>,
}
