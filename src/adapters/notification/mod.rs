//! Payment notification adapters.
//!
//! - `ResendNotifier` - delivers email through the Resend API
//! - `LoggingNotifier` - logs only, for deployments without an API key
//! - `RecordingNotifier` - captures notifications for tests

mod logging_notifier;
mod resend_notifier;
mod templates;

pub use logging_notifier::{LoggingNotifier, RecordingNotifier, SentNotification};
pub use resend_notifier::ResendNotifier;
pub use templates::{EmailLinks, RenderedEmail};
