//! In-memory adapters.
//!
//! Used by tests and by the binary when no database URL is configured.
//! Lock poisoning is recovered from rather than propagated; every mutation
//! is a single critical section, so a poisoned guard still holds consistent
//! data.

mod content_store;
mod payment_repository;
mod team_repository;
mod user_repository;

pub use content_store::InMemoryContentStore;
pub use payment_repository::InMemoryPaymentRepository;
pub use team_repository::InMemoryTeamRepository;
pub use user_repository::InMemoryUserRepository;
