//! Plan, access tier and account role definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Membership plan held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    /// Default plan. Never expires, never downloads.
    Free,

    /// Individual paid plan. Downloads STANDARD resources.
    Standard,

    /// Team paid plan. Downloads every resource and is shared with members.
    Team,
}

impl Plan {
    /// Returns true if this plan must carry an expiry window.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Plan::Free)
    }

    /// Stable wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Standard => "STANDARD",
            Plan::Team => "TEAM",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FREE" => Ok(Plan::Free),
            "STANDARD" => Ok(Plan::Standard),
            "TEAM" => Ok(Plan::Team),
            other => Err(ValidationError::invalid_format(
                "plan",
                format!("unknown plan '{}'", other),
            )),
        }
    }
}

/// A plan that can be purchased through a payment.
///
/// Kept separate from [`Plan`] so a payment for FREE cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaidPlan {
    Standard,
    Team,
}

impl PaidPlan {
    /// Stable wire/storage name.
    pub fn as_str(&self) -> &'static str {
        Plan::from(*self).as_str()
    }
}

impl From<PaidPlan> for Plan {
    fn from(plan: PaidPlan) -> Self {
        match plan {
            PaidPlan::Standard => Plan::Standard,
            PaidPlan::Team => Plan::Team,
        }
    }
}

impl TryFrom<Plan> for PaidPlan {
    type Error = ValidationError;

    fn try_from(plan: Plan) -> Result<Self, Self::Error> {
        match plan {
            Plan::Standard => Ok(PaidPlan::Standard),
            Plan::Team => Ok(PaidPlan::Team),
            Plan::Free => Err(ValidationError::invalid_format(
                "plan_requested",
                "FREE cannot be purchased",
            )),
        }
    }
}

impl fmt::Display for PaidPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-level content classification owned by the content catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessTier {
    Standard,
    Premium,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Standard => "STANDARD",
            AccessTier::Premium => "PREMIUM",
        }
    }
}

impl FromStr for AccessTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STANDARD" => Ok(AccessTier::Standard),
            "PREMIUM" => Ok(AccessTier::Premium),
            other => Err(ValidationError::invalid_format(
                "access_tier",
                format!("unknown access tier '{}'", other),
            )),
        }
    }
}

/// Platform-level role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    #[default]
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => "USER",
            AccountRole::Admin => "ADMIN",
        }
    }
}

impl FromStr for AccountRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(AccountRole::User),
            "ADMIN" => Ok(AccountRole::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown account role '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_free_is_unpaid() {
        assert!(!Plan::Free.is_paid());
        assert!(Plan::Standard.is_paid());
        assert!(Plan::Team.is_paid());
    }

    #[test]
    fn plan_serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&Plan::Team).unwrap(), "\"TEAM\"");
        let plan: Plan = serde_json::from_str("\"STANDARD\"").unwrap();
        assert_eq!(plan, Plan::Standard);
    }

    #[test]
    fn plan_parses_case_insensitively() {
        assert_eq!("team".parse::<Plan>().unwrap(), Plan::Team);
        assert!("GOLD".parse::<Plan>().is_err());
    }

    #[test]
    fn free_cannot_become_paid_plan() {
        assert!(PaidPlan::try_from(Plan::Free).is_err());
        assert_eq!(PaidPlan::try_from(Plan::Team).unwrap(), PaidPlan::Team);
    }

    #[test]
    fn paid_plan_rejects_free_on_the_wire() {
        assert!(serde_json::from_str::<PaidPlan>("\"FREE\"").is_err());
    }

    #[test]
    fn access_tier_round_trips_through_storage_name() {
        for tier in [AccessTier::Standard, AccessTier::Premium] {
            assert_eq!(tier.as_str().parse::<AccessTier>().unwrap(), tier);
        }
    }

    #[test]
    fn account_role_defaults_to_user() {
        assert_eq!(AccountRole::default(), AccountRole::User);
    }
}
