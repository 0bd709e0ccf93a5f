//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `entitlement` - Plans, renewal policy, the access evaluator and user accounts
//! - `payment` - Payment proofs and their review lifecycle
//! - `team` - Teams, memberships and invitations
//! - `download` - Download accounting and library

pub mod download;
pub mod entitlement;
pub mod foundation;
pub mod payment;
pub mod team;
