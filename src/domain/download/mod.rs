//! Download module - download audit records and library view.

mod errors;
mod record;

pub use errors::DownloadError;
pub use record::{
    build_library, ContentSummary, DownloadRecord, LibraryEntry, ResourceDescriptor, ResourceType,
};
