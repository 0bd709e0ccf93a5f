//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `UserRepository` - accounts and their entitlement snapshot
//! - `PaymentRepository` - payment proofs with a conditional review write
//! - `TeamRepository` / `InvitationRepository` - teams, capacity-checked joins
//! - `DownloadRepository` - append-only download log plus counter
//! - `ContentCatalog` - read-only content and resource lookup
//!
//! ## Collaborators
//!
//! - `Clock` - current instant
//! - `SessionValidator` - bearer token validation
//! - `PaymentNotifier` - payer notifications

mod clock;
mod content_catalog;
mod download_repository;
mod payment_notifier;
mod payment_repository;
mod session_validator;
mod team_repository;
mod user_repository;

pub use clock::Clock;
pub use content_catalog::ContentCatalog;
pub use download_repository::DownloadRepository;
pub use payment_notifier::PaymentNotifier;
pub use payment_repository::{PaymentRepository, TransitionOutcome};
pub use session_validator::SessionValidator;
pub use team_repository::{AddMemberOutcome, InvitationRepository, TeamRepository};
pub use user_repository::{PlanStats, UserRepository};
