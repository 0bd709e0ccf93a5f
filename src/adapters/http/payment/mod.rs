//! HTTP adapter for payment endpoints.
//!
//! - `GET /api/payments` / `POST /api/payments` - payer history and submission
//! - `POST /api/payments/:id/receipt` - attach receipt
//! - `/api/admin/payments/...` - review queue

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_payment_routes, payment_routes};
