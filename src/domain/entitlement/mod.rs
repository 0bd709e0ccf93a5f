//! Entitlement module - plans, renewal policy and access evaluation.
//!
//! # Module Structure
//!
//! - `plan` - Plan, paid plan, access tier and account role enums
//! - `policy` - Renewal/grace constants and window computation
//! - `evaluator` - Pure `is_plan_active` / `can_download` rules
//! - `account` - User account aggregate carrying the entitlement snapshot
//! - `errors` - Account error type

mod account;
mod errors;
mod evaluator;
mod plan;
mod policy;

pub use account::{normalize_email, UserAccount};
pub use errors::AccountError;
pub use evaluator::{
    can_download, downloadable_tiers, is_in_grace_period, is_plan_active, EntitlementSnapshot,
};
pub use plan::{AccessTier, AccountRole, PaidPlan, Plan};
pub use policy::{EntitlementPolicy, EntitlementWindow};
