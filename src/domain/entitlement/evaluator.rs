//! Entitlement evaluation.
//!
//! Pure functions over a plan snapshot and an instant. No I/O and no shared
//! state, so they can run on every access check.

use serde::{Deserialize, Serialize};

use super::plan::{AccessTier, Plan};
use crate::domain::foundation::Timestamp;

/// The entitlement-bearing fields of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementSnapshot {
    pub plan: Plan,
    pub plan_expires_at: Option<Timestamp>,
    pub grace_until: Option<Timestamp>,
}

impl EntitlementSnapshot {
    /// Snapshot of a freshly registered account.
    pub fn free() -> Self {
        Self {
            plan: Plan::Free,
            plan_expires_at: None,
            grace_until: None,
        }
    }
}

/// Returns true if the plan grants access at `now`.
///
/// FREE is always active. A paid plan is active while either its expiry or
/// its grace deadline is at or after `now`; a paid plan with neither set has
/// never been paid and is inactive.
pub fn is_plan_active(snapshot: &EntitlementSnapshot, now: Timestamp) -> bool {
    if snapshot.plan == Plan::Free {
        return true;
    }
    let expires_ok = snapshot.plan_expires_at.map_or(false, |t| t >= now);
    let grace_ok = snapshot.grace_until.map_or(false, |t| t >= now);
    expires_ok || grace_ok
}

/// Returns true if the holder of `snapshot` may download a resource of
/// `tier` at `now`.
pub fn can_download(snapshot: &EntitlementSnapshot, tier: AccessTier, now: Timestamp) -> bool {
    if !is_plan_active(snapshot, now) {
        return false;
    }
    match (snapshot.plan, tier) {
        (Plan::Free, _) => false,
        (Plan::Standard, AccessTier::Premium) => false,
        (Plan::Standard, AccessTier::Standard) => true,
        (Plan::Team, _) => true,
    }
}

/// Returns true if the nominal expiry has passed but grace still holds.
pub fn is_in_grace_period(snapshot: &EntitlementSnapshot, now: Timestamp) -> bool {
    if snapshot.plan == Plan::Free {
        return false;
    }
    let expired = snapshot.plan_expires_at.map_or(true, |t| t < now);
    let grace_ok = snapshot.grace_until.map_or(false, |t| t >= now);
    expired && grace_ok
}

/// Tiers the holder of `snapshot` may download right now.
pub fn downloadable_tiers(snapshot: &EntitlementSnapshot, now: Timestamp) -> Vec<AccessTier> {
    [AccessTier::Standard, AccessTier::Premium]
        .into_iter()
        .filter(|tier| can_download(snapshot, *tier, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2026-05-10T08:00:00Z").unwrap()
    }

    fn snapshot(plan: Plan, expires: Option<i64>, grace: Option<i64>) -> EntitlementSnapshot {
        EntitlementSnapshot {
            plan,
            plan_expires_at: expires.map(|d| now().plus_days(d)),
            grace_until: grace.map(|d| now().plus_days(d)),
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // is_plan_active
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn free_plan_is_active() {
        assert!(is_plan_active(&EntitlementSnapshot::free(), now()));
    }

    #[test]
    fn paid_plan_before_expiry_is_active() {
        assert!(is_plan_active(&snapshot(Plan::Standard, Some(2), Some(5)), now()));
    }

    #[test]
    fn paid_plan_in_grace_is_active() {
        assert!(is_plan_active(&snapshot(Plan::Team, Some(-1), Some(2)), now()));
    }

    #[test]
    fn paid_plan_after_grace_is_inactive() {
        assert!(!is_plan_active(&snapshot(Plan::Team, Some(-5), Some(-2)), now()));
    }

    #[test]
    fn paid_plan_never_paid_is_inactive() {
        assert!(!is_plan_active(&snapshot(Plan::Standard, None, None), now()));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let snap = EntitlementSnapshot {
            plan: Plan::Standard,
            plan_expires_at: Some(now()),
            grace_until: None,
        };
        assert!(is_plan_active(&snap, now()));
    }

    // ════════════════════════════════════════════════════════════════════
    // can_download
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn standard_plan_cannot_download_premium_while_active() {
        let snap = snapshot(Plan::Standard, Some(2), Some(5));
        assert!(is_plan_active(&snap, now()));
        assert!(!can_download(&snap, AccessTier::Premium, now()));
    }

    #[test]
    fn standard_plan_downloads_standard() {
        let snap = snapshot(Plan::Standard, Some(2), Some(5));
        assert!(can_download(&snap, AccessTier::Standard, now()));
    }

    #[test]
    fn team_plan_downloads_every_tier() {
        let snap = snapshot(Plan::Team, Some(2), Some(5));
        assert!(can_download(&snap, AccessTier::Standard, now()));
        assert!(can_download(&snap, AccessTier::Premium, now()));
    }

    #[test]
    fn free_plan_never_downloads() {
        let snap = EntitlementSnapshot::free();
        assert!(!can_download(&snap, AccessTier::Standard, now()));
        assert!(!can_download(&snap, AccessTier::Premium, now()));
    }

    #[test]
    fn lapsed_team_plan_cannot_download() {
        let snap = snapshot(Plan::Team, Some(-10), Some(-7));
        assert!(!can_download(&snap, AccessTier::Standard, now()));
    }

    // ════════════════════════════════════════════════════════════════════
    // grace and tiers
    // ════════════════════════════════════════════════════════════════════

    #[test]
    fn grace_period_only_after_expiry() {
        assert!(!is_in_grace_period(&snapshot(Plan::Team, Some(1), Some(4)), now()));
        assert!(is_in_grace_period(&snapshot(Plan::Team, Some(-1), Some(2)), now()));
        assert!(!is_in_grace_period(&snapshot(Plan::Team, Some(-4), Some(-1)), now()));
    }

    #[test]
    fn downloadable_tiers_reflect_plan() {
        assert!(downloadable_tiers(&EntitlementSnapshot::free(), now()).is_empty());
        assert_eq!(
            downloadable_tiers(&snapshot(Plan::Standard, Some(3), Some(6)), now()),
            vec![AccessTier::Standard]
        );
        assert_eq!(
            downloadable_tiers(&snapshot(Plan::Team, Some(3), Some(6)), now()),
            vec![AccessTier::Standard, AccessTier::Premium]
        );
    }

    // ════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════

    fn arb_plan() -> impl Strategy<Value = Plan> {
        prop_oneof![Just(Plan::Free), Just(Plan::Standard), Just(Plan::Team)]
    }

    fn arb_tier() -> impl Strategy<Value = AccessTier> {
        prop_oneof![Just(AccessTier::Standard), Just(AccessTier::Premium)]
    }

    fn arb_instant() -> impl Strategy<Value = Option<Timestamp>> {
        proptest::option::of((-400i64..400).prop_map(|hours| {
            let base = Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap();
            Timestamp::from_datetime(base + Duration::hours(hours))
        }))
    }

    fn arb_snapshot() -> impl Strategy<Value = EntitlementSnapshot> {
        (arb_plan(), arb_instant(), arb_instant()).prop_map(|(plan, expires, grace)| {
            EntitlementSnapshot {
                plan,
                plan_expires_at: expires,
                grace_until: grace,
            }
        })
    }

    proptest! {
        #[test]
        fn free_is_active_regardless_of_timestamps(
            expires in arb_instant(),
            grace in arb_instant(),
        ) {
            let snap = EntitlementSnapshot { plan: Plan::Free, plan_expires_at: expires, grace_until: grace };
            prop_assert!(is_plan_active(&snap, now()));
        }

        #[test]
        fn inactive_or_free_never_downloads(snap in arb_snapshot(), tier in arb_tier()) {
            if !is_plan_active(&snap, now()) || snap.plan == Plan::Free {
                prop_assert!(!can_download(&snap, tier, now()));
            }
        }

        #[test]
        fn download_implies_active(snap in arb_snapshot(), tier in arb_tier()) {
            if can_download(&snap, tier, now()) {
                prop_assert!(is_plan_active(&snap, now()));
            }
        }
    }
}
