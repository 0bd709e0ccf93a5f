//! Team module - shared TEAM plans.
//!
//! - `aggregate` - Team, TeamMembership, TeamRole
//! - `invitation` - TeamInvitation and its status
//! - `errors` - Team error type

mod aggregate;
mod errors;
mod invitation;

pub use aggregate::{Team, TeamMembership, TeamRole};
pub use errors::TeamError;
pub use invitation::{InvitationStatus, TeamInvitation};
