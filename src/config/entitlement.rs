//! Entitlement policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::entitlement::EntitlementPolicy;

/// Renewal and team limits. Every field defaults to the product values.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitlementConfig {
    #[serde(default = "default_renewal_days")]
    pub renewal_days: i64,

    #[serde(default = "default_grace_days")]
    pub grace_days: i64,

    #[serde(default = "default_max_team_members")]
    pub max_team_members: u32,

    #[serde(default = "default_invitation_ttl_days")]
    pub invitation_ttl_days: i64,
}

impl EntitlementConfig {
    pub fn policy(&self) -> EntitlementPolicy {
        EntitlementPolicy {
            renewal_days: self.renewal_days,
            grace_days: self.grace_days,
            max_team_members: self.max_team_members,
            invitation_ttl_days: self.invitation_ttl_days,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.renewal_days <= 0 {
            return Err(ValidationError::invalid(
                "ENTITLEMENT__RENEWAL_DAYS",
                "must be positive",
            ));
        }
        if self.grace_days < 0 {
            return Err(ValidationError::invalid(
                "ENTITLEMENT__GRACE_DAYS",
                "cannot be negative",
            ));
        }
        if self.max_team_members < 2 {
            return Err(ValidationError::invalid(
                "ENTITLEMENT__MAX_TEAM_MEMBERS",
                "must allow the owner plus one member",
            ));
        }
        if self.invitation_ttl_days <= 0 {
            return Err(ValidationError::invalid(
                "ENTITLEMENT__INVITATION_TTL_DAYS",
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            renewal_days: default_renewal_days(),
            grace_days: default_grace_days(),
            max_team_members: default_max_team_members(),
            invitation_ttl_days: default_invitation_ttl_days(),
        }
    }
}

fn default_renewal_days() -> i64 {
    EntitlementPolicy::DEFAULT_RENEWAL_DAYS
}

fn default_grace_days() -> i64 {
    EntitlementPolicy::DEFAULT_GRACE_DAYS
}

fn default_max_team_members() -> u32 {
    EntitlementPolicy::DEFAULT_MAX_TEAM_MEMBERS
}

fn default_invitation_ttl_days() -> i64 {
    EntitlementPolicy::DEFAULT_INVITATION_TTL_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        assert_eq!(EntitlementConfig::default().policy(), EntitlementPolicy::default());
    }

    #[test]
    fn test_rejects_zero_renewal() {
        let config = EntitlementConfig {
            renewal_days: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err().key(),
            "ENTITLEMENT__RENEWAL_DAYS"
        );
    }

    #[test]
    fn test_single_seat_team_is_rejected() {
        let config = EntitlementConfig {
            max_team_members: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
