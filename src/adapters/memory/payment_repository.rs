//! In-memory payment repository.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, UserId};
use crate::domain::payment::{Payment, PaymentStatus, Receipt};
use crate::ports::{PaymentRepository, TransitionOutcome};

/// Payments in submission order. The conditional review write checks and
/// writes under the same lock.
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment(self, payment: Payment) -> Self {
        self.payments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payment);
        self
    }

    pub fn get(&self, id: &PaymentId) -> Option<Payment> {
        self.payments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    fn newest_first(mut payments: Vec<Payment>) -> Vec<Payment> {
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        if payments.iter().any(|p| p.id == payment.id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Payment {} already exists", payment.id),
            ));
        }
        payments.push(payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.get(id))
    }

    async fn list_by_user(&self, uid: &UserId) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Self::newest_first(
            payments.iter().filter(|p| &p.uid == uid).cloned().collect(),
        ))
    }

    async fn list(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Self::newest_first(
            payments
                .iter()
                .filter(|p| status.map_or(true, |s| p.status == s))
                .cloned()
                .collect(),
        ))
    }

    async fn set_receipt(
        &self,
        id: &PaymentId,
        uid: &UserId,
        receipt: &Receipt,
    ) -> Result<bool, DomainError> {
        let mut payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        match payments.iter_mut().find(|p| &p.id == id && &p.uid == uid) {
            Some(payment) => {
                payment.attach_receipt(receipt.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transition_from_pending(
        &self,
        reviewed: &Payment,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = payments.iter_mut().find(|p| p.id == reviewed.id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        if stored.status != PaymentStatus::Pending {
            return Ok(TransitionOutcome::NotPending);
        }
        stored.status = reviewed.status;
        stored.reviewed_by = reviewed.reviewed_by.clone();
        stored.reviewed_at = reviewed.reviewed_at;
        stored.note = reviewed.note.clone();
        Ok(TransitionOutcome::Applied)
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<u64, DomainError> {
        let payments = self.payments.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(payments.iter().filter(|p| p.status == status).count() as u64)
    }
}
