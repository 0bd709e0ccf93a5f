//! HTTP adapter for teams: creation, invitations and membership.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::team_routes;
