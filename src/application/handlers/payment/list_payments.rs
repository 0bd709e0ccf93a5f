//! Payment queries - the payer's history and the admin review queue.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::payment::{Payment, PaymentError, PaymentStatus};
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct ListMyPaymentsQuery {
    pub uid: UserId,
}

pub struct ListMyPaymentsHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl ListMyPaymentsHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    /// Newest first.
    pub async fn handle(&self, query: ListMyPaymentsQuery) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.repository.list_by_user(&query.uid).await?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListPaymentsQuery {
    pub status: Option<PaymentStatus>,
}

/// Admin listing, optionally narrowed to one status.
pub struct ListPaymentsHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl ListPaymentsHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.repository.list(query.status).await?)
    }
}
