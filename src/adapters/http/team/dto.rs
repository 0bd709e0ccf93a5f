//! Data Transfer Objects for team endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::team::TeamView;
use crate::domain::team::{TeamInvitation, TeamRole};

/// Body of `POST /api/teams`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Body of `POST /api/teams/:id/invitations`.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteMemberRequest {
    pub email: String,
    #[serde(default = "default_invite_role")]
    pub role: TeamRole,
}

fn default_invite_role() -> TeamRole {
    TeamRole::Member
}

/// `GET /api/teams/mine`. `team` is null for users outside any team.
#[derive(Debug, Clone, Serialize)]
pub struct MyTeamResponse {
    pub team: Option<TeamView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub invitation: TeamInvitation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_role_defaults_to_member() {
        let req: InviteMemberRequest =
            serde_json::from_value(serde_json::json!({ "email": "joel@kantik.ht" })).unwrap();
        assert_eq!(req.role, TeamRole::Member);
    }

    #[test]
    fn invite_role_is_read_from_wire_name() {
        let req: InviteMemberRequest = serde_json::from_value(
            serde_json::json!({ "email": "joel@kantik.ht", "role": "ADMIN" }),
        )
        .unwrap();
        assert_eq!(req.role, TeamRole::Admin);
    }
}
