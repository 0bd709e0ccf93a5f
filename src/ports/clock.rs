//! Time source port.
//!
//! All temporal comparisons in the service are made against the instant a
//! `Clock` returns, so tests can pin time with a fixed implementation.

use crate::domain::foundation::Timestamp;

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
