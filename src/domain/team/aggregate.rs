//! Team aggregate and membership records.
//!
//! # Invariants
//!
//! - member count never exceeds `max_members` (enforced by the repository's
//!   conditional insert)
//! - the owner holds the only OWNER membership and cannot be removed

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::TeamError;
use crate::domain::foundation::{TeamId, TeamMembershipId, Timestamp, UserId, ValidationError};

/// Role a user holds inside a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamRole {
    Owner,
    Admin,
    Member,
}

impl TeamRole {
    /// Owners and admins may invite and remove members.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, TeamRole::Owner | TeamRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Owner => "OWNER",
            TeamRole::Admin => "ADMIN",
            TeamRole::Member => "MEMBER",
        }
    }
}

impl FromStr for TeamRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OWNER" => Ok(TeamRole::Owner),
            "ADMIN" => Ok(TeamRole::Admin),
            "MEMBER" => Ok(TeamRole::Member),
            other => Err(ValidationError::invalid_format(
                "role_in_team",
                format!("unknown team role '{}'", other),
            )),
        }
    }
}

/// A billing group owned by one TEAM-plan user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub owner_uid: UserId,
    pub max_members: u32,
    pub created_at: Timestamp,
}

impl Team {
    pub fn create(
        id: TeamId,
        name: &str,
        owner_uid: UserId,
        max_members: u32,
        now: Timestamp,
    ) -> Result<Self, TeamError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TeamError::validation("name", "team name is required"));
        }
        if max_members == 0 {
            return Err(TeamError::validation("max_members", "must be at least 1"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            owner_uid,
            max_members,
            created_at: now,
        })
    }

    pub fn is_owner(&self, uid: &UserId) -> bool {
        &self.owner_uid == uid
    }

    /// The OWNER membership created alongside the team.
    pub fn owner_membership(&self, email: impl Into<String>) -> TeamMembership {
        TeamMembership {
            id: TeamMembershipId::new(),
            team_id: self.id,
            uid: self.owner_uid.clone(),
            email: email.into(),
            role: TeamRole::Owner,
            joined_at: self.created_at,
        }
    }
}

/// Join record between a team and a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: TeamMembershipId,
    pub team_id: TeamId,
    pub uid: UserId,
    pub email: String,
    pub role: TeamRole,
    pub joined_at: Timestamp,
}

impl TeamMembership {
    pub fn new(
        team_id: TeamId,
        uid: UserId,
        email: impl Into<String>,
        role: TeamRole,
        now: Timestamp,
    ) -> Self {
        Self {
            id: TeamMembershipId::new(),
            team_id,
            uid,
            email: email.into(),
            role,
            joined_at: now,
        }
    }
}
