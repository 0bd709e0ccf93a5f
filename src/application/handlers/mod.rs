//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod download;
pub mod payment;
pub mod team;

pub use account::{
    AdminStats, ChangeRoleCommand, ChangeRoleHandler, EntitlementView, GetEntitlementHandler,
    GetEntitlementQuery, GetStatsHandler, GetStatsQuery, ProvisionAccountCommand,
    ProvisionAccountHandler, ResetPlanCommand, ResetPlanHandler, UpdateUserPlanCommand,
    UpdateUserPlanHandler,
};
pub use download::{
    GetLibraryHandler, GetLibraryQuery, RecordDownloadCommand, RecordDownloadHandler,
};
pub use payment::{
    AttachReceiptCommand, AttachReceiptHandler, GetPaymentHandler, GetPaymentQuery,
    GetReceiptHandler, GetReceiptQuery, ListMyPaymentsHandler, ListMyPaymentsQuery,
    ListPaymentsHandler, ListPaymentsQuery, PaymentDetail, PaymentStore, ReviewPaymentCommand,
    ReviewPaymentHandler, ReviewPaymentResult, SubmitPaymentCommand, SubmitPaymentHandler,
};
pub use team::{
    AcceptInvitationCommand, AcceptInvitationHandler, CreateTeamCommand, CreateTeamHandler,
    GetMyTeamHandler, GetMyTeamQuery, InviteMemberCommand, InviteMemberHandler,
    PropagationReport, RemoveMemberCommand, RemoveMemberHandler, TeamPropagation, TeamView,
};
