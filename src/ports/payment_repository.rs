//! Payment repository port.
//!
//! # Review atomicity
//!
//! `transition_from_pending` is a compare-and-set: it must persist the
//! reviewed fields only if the stored status is still PENDING at write time
//! (e.g. `UPDATE ... WHERE id = $1 AND status = 'PENDING'`). Two concurrent
//! reviews of one payment therefore yield one `Applied` and one `NotPending`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId, UserId};
use crate::domain::payment::{Payment, PaymentStatus, Receipt};

/// Result of a conditional status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The reviewed fields were written.
    Applied,

    /// No payment with that id.
    NotFound,

    /// Payment exists but already left PENDING.
    NotPending,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Payments submitted by `uid`, newest first.
    async fn list_by_user(&self, uid: &UserId) -> Result<Vec<Payment>, DomainError>;

    /// All payments, optionally filtered by status, newest first.
    async fn list(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, DomainError>;

    /// Set the receipt on a payment owned by `uid`.
    ///
    /// Returns `false` if no payment with that id belongs to `uid`.
    async fn set_receipt(
        &self,
        id: &PaymentId,
        uid: &UserId,
        receipt: &Receipt,
    ) -> Result<bool, DomainError>;

    /// Persist `reviewed`'s status, reviewer, review instant and note if the
    /// stored payment is still PENDING.
    async fn transition_from_pending(
        &self,
        reviewed: &Payment,
    ) -> Result<TransitionOutcome, DomainError>;

    async fn count_by_status(&self, status: PaymentStatus) -> Result<u64, DomainError>;
}
