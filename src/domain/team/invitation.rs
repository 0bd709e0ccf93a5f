//! Team invitations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::aggregate::TeamRole;
use super::errors::TeamError;
use crate::domain::entitlement::normalize_email;
use crate::domain::foundation::{
    InvitationId, StateMachine, TeamId, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::Accepted => "ACCEPTED",
        }
    }
}

impl FromStr for InvitationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(InvitationStatus::Pending),
            "ACCEPTED" => Ok(InvitationStatus::Accepted),
            other => Err(ValidationError::invalid_format(
                "invitation_status",
                format!("unknown invitation status '{}'", other),
            )),
        }
    }
}

impl StateMachine for InvitationStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            InvitationStatus::Pending => &[InvitationStatus::Accepted],
            InvitationStatus::Accepted => &[],
        }
    }
}

/// An offer to join a team, addressed to an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInvitation {
    pub id: InvitationId,
    pub team_id: TeamId,
    pub email: String,
    pub role: TeamRole,
    pub invited_by: UserId,
    pub status: InvitationStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl TeamInvitation {
    /// Issues a PENDING invitation valid for `ttl_days`.
    ///
    /// OWNER cannot be granted through an invitation.
    pub fn issue(
        team_id: TeamId,
        email: &str,
        role: TeamRole,
        invited_by: UserId,
        ttl_days: i64,
        now: Timestamp,
    ) -> Result<Self, TeamError> {
        if role == TeamRole::Owner {
            return Err(TeamError::validation("role", "cannot invite an owner"));
        }
        Ok(Self {
            id: InvitationId::new(),
            team_id,
            email: normalize_email(email)?,
            role,
            invited_by,
            status: InvitationStatus::Pending,
            created_at: now,
            expires_at: now.plus_days(ttl_days),
        })
    }

    /// Pending and not past its expiry.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.status == InvitationStatus::Pending && now <= self.expires_at
    }

    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    pub fn accept(&mut self) -> Result<(), TeamError> {
        self.status = self
            .status
            .transition_to(InvitationStatus::Accepted)
            .map_err(|_| TeamError::invitation_not_found(self.id))?;
        Ok(())
    }
}
