//! Admin payment detail and receipt lookup.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::entitlement::UserAccount;
use crate::domain::foundation::PaymentId;
use crate::domain::payment::{Payment, PaymentError, Receipt};
use crate::ports::{PaymentRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetPaymentQuery {
    pub payment_id: PaymentId,
}

/// A payment with the payer's current account, if it still exists.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetail {
    pub payment: Payment,
    pub payer: Option<UserAccount>,
}

pub struct GetPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    users: Arc<dyn UserRepository>,
}

impl GetPaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { payments, users }
    }

    pub async fn handle(&self, query: GetPaymentQuery) -> Result<PaymentDetail, PaymentError> {
        let payment = self
            .payments
            .find_by_id(&query.payment_id)
            .await?
            .ok_or_else(|| PaymentError::not_found(query.payment_id))?;
        let payer = self.users.find_by_id(&payment.uid).await?;

        Ok(PaymentDetail { payment, payer })
    }
}

#[derive(Debug, Clone)]
pub struct GetReceiptQuery {
    pub payment_id: PaymentId,
}

pub struct GetReceiptHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl GetReceiptHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// # Errors
    ///
    /// - `NotFound` if the payment does not exist
    /// - `ReceiptNotFound` if nothing was uploaded for it
    pub async fn handle(&self, query: GetReceiptQuery) -> Result<Receipt, PaymentError> {
        let payment = self
            .payments
            .find_by_id(&query.payment_id)
            .await?
            .ok_or_else(|| PaymentError::not_found(query.payment_id))?;

        payment
            .receipt
            .ok_or_else(|| PaymentError::receipt_not_found(query.payment_id))
    }
}
