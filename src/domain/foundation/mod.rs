//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and the state machine trait
//! that form the vocabulary of the entitlement domain.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ContentId, DownloadId, InvitationId, PaymentId, TeamId, TeamMembershipId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
