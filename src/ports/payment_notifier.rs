//! Payment notification port.
//!
//! Delivery is fire-and-forget from the caller's point of view: callers log
//! a returned error and carry on.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::payment::Payment;

#[async_trait]
pub trait PaymentNotifier: Send + Sync {
    /// Acknowledge a new submission to the payer.
    async fn payment_submitted(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Tell the payer their plan is active until `expires_at`.
    async fn payment_approved(
        &self,
        payment: &Payment,
        expires_at: Timestamp,
    ) -> Result<(), DomainError>;

    /// Tell the payer the proof was refused, with the reviewer's note.
    async fn payment_rejected(&self, payment: &Payment) -> Result<(), DomainError>;
}
