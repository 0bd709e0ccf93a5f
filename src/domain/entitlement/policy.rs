//! Entitlement window and the renewal policy that produces it.
//!
//! # Renewal rule
//!
//! An approval extends an unexpired plan from its current expiry (renewals
//! stack), but an approval on a lapsed plan restarts from the approval
//! instant so dead time is never banked. The grace buffer is always measured
//! from the new expiry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Expiry plus grace, written together on a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementWindow {
    pub expires_at: Timestamp,
    pub grace_until: Timestamp,
}

/// Tunable constants for renewal, grace and team size.
///
/// Injected into the review and team handlers so tests can override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementPolicy {
    /// Days added per approved payment.
    pub renewal_days: i64,

    /// Days of access kept after nominal expiry.
    pub grace_days: i64,

    /// Hard cap on team size, owner included.
    pub max_team_members: u32,

    /// Lifetime of a team invitation.
    pub invitation_ttl_days: i64,
}

impl EntitlementPolicy {
    pub const DEFAULT_RENEWAL_DAYS: i64 = 30;
    pub const DEFAULT_GRACE_DAYS: i64 = 3;
    pub const DEFAULT_MAX_TEAM_MEMBERS: u32 = 7;
    pub const DEFAULT_INVITATION_TTL_DAYS: i64 = 7;

    /// Computes the window granted by an approval at `now`.
    pub fn renew(&self, current_expires_at: Option<Timestamp>, now: Timestamp) -> EntitlementWindow {
        let base = match current_expires_at {
            Some(expires) if expires > now => expires,
            _ => now,
        };
        self.window_ending_at(base.plus_days(self.renewal_days))
    }

    /// Builds a window with the standard grace buffer after `expires_at`.
    pub fn window_ending_at(&self, expires_at: Timestamp) -> EntitlementWindow {
        EntitlementWindow {
            expires_at,
            grace_until: expires_at.plus_days(self.grace_days),
        }
    }
}

impl Default for EntitlementPolicy {
    fn default() -> Self {
        Self {
            renewal_days: Self::DEFAULT_RENEWAL_DAYS,
            grace_days: Self::DEFAULT_GRACE_DAYS,
            max_team_members: Self::DEFAULT_MAX_TEAM_MEMBERS,
            invitation_ttl_days: Self::DEFAULT_INVITATION_TTL_DAYS,
        }
    }
}
