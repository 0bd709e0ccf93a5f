//! Payment module - manually reviewed payment proofs.
//!
//! # Module Structure
//!
//! - `aggregate` - Payment entity and its review transition
//! - `status` - PENDING/APPROVED/REJECTED state machine and review decision
//! - `values` - Channel, currency, money, billing month, receipt
//! - `errors` - Payment error type

mod aggregate;
mod errors;
mod status;
mod values;

pub use aggregate::{Payment, PaymentSubmission};
pub use errors::PaymentError;
pub use status::{PaymentStatus, ReviewDecision};
pub use values::{BillingMonth, Currency, Money, PaymentChannel, Receipt};
