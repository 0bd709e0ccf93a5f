//! Download accounting records and the content views they rely on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entitlement::AccessTier;
use crate::domain::foundation::{ContentId, DownloadId, Timestamp, UserId, ValidationError};

/// Variant tag of a downloadable resource (e.g. `pdf`, `chords`, `audio`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceType(String);

impl ResourceType {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty() {
            return Err(ValidationError::empty_field("resource_type"));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::invalid_format(
                "resource_type",
                "only letters, digits, '-' and '_' are allowed",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResourceType::new(&value)
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog view of a content entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: ContentId,
    pub title: String,
    pub access_tier: AccessTier,
    pub downloads_count: i64,
}

/// Where the bytes of one resource variant live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub content_id: ContentId,
    pub resource_type: ResourceType,
    pub blob_ref: String,
    pub filename: String,
    pub content_type: String,
}

/// Append-only audit entry for one accepted download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub uid: UserId,
    pub content_id: ContentId,
    pub resource_type: ResourceType,
    pub created_at: Timestamp,
}

impl DownloadRecord {
    pub fn new(
        uid: UserId,
        content_id: ContentId,
        resource_type: ResourceType,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DownloadId::new(),
            uid,
            content_id,
            resource_type,
            created_at: now,
        }
    }
}

/// One library row: a content the user downloaded and when first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub content_id: ContentId,
    pub first_downloaded_at: Timestamp,
    pub download_count: u32,
}

/// Folds download records into distinct library entries, oldest first.
pub fn build_library(records: &[DownloadRecord]) -> Vec<LibraryEntry> {
    let mut entries: Vec<LibraryEntry> = Vec::new();
    for record in records {
        match entries
            .iter_mut()
            .find(|e| e.content_id == record.content_id)
        {
            Some(entry) => {
                entry.download_count += 1;
                if record.created_at < entry.first_downloaded_at {
                    entry.first_downloaded_at = record.created_at;
                }
            }
            None => entries.push(LibraryEntry {
                content_id: record.content_id.clone(),
                first_downloaded_at: record.created_at,
                download_count: 1,
            }),
        }
    }
    entries.sort_by(|a, b| a.first_downloaded_at.cmp(&b.first_downloaded_at));
    entries
}
