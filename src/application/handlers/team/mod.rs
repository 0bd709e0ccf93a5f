//! Team command and query handlers.

mod accept_invitation;
mod create_team;
mod get_team;
mod invite_member;
mod propagate_entitlement;
mod remove_member;

pub use accept_invitation::{AcceptInvitationCommand, AcceptInvitationHandler};
pub use create_team::{CreateTeamCommand, CreateTeamHandler};
pub use get_team::{GetMyTeamHandler, GetMyTeamQuery, TeamView};
pub use invite_member::{InviteMemberCommand, InviteMemberHandler};
pub use propagate_entitlement::{PropagationReport, TeamPropagation};
pub use remove_member::{RemoveMemberCommand, RemoveMemberHandler};
