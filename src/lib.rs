//! Kantik Tracks - plan entitlements and manual payment review.
//!
//! Members pay for a plan through MonCash or a bank transfer, upload proof,
//! and an administrator approves or rejects it. Approval extends the payer's
//! access window and, for team plans, every member's. The entitlement
//! evaluator decides which catalog tiers an account may download.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
