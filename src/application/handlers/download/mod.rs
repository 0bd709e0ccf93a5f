//! Download command and query handlers.

mod get_library;
mod record_download;

pub use get_library::{GetLibraryHandler, GetLibraryQuery};
pub use record_download::{RecordDownloadCommand, RecordDownloadHandler};
