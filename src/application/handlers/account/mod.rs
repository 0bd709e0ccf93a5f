//! Account command and query handlers.

mod change_role;
mod get_entitlement;
mod get_stats;
mod get_user_detail;
mod list_users;
mod provision_account;
mod update_plan;

pub use change_role::{ChangeRoleCommand, ChangeRoleHandler};
pub use get_entitlement::{EntitlementView, GetEntitlementHandler, GetEntitlementQuery};
pub use get_stats::{AdminStats, GetStatsHandler, GetStatsQuery};
pub use get_user_detail::{GetUserDetailHandler, GetUserDetailQuery, UserDetail, RECENT_PAYMENTS};
pub use list_users::{ListUsersHandler, ListUsersQuery, UserSummary};
pub use provision_account::{ProvisionAccountCommand, ProvisionAccountHandler};
pub use update_plan::{ResetPlanCommand, ResetPlanHandler, UpdateUserPlanCommand, UpdateUserPlanHandler};
