//! SubmitPaymentHandler - Command handler for payment proof submission.

use std::sync::Arc;

use super::PaymentStore;
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::payment::{Payment, PaymentError, PaymentSubmission};
use crate::ports::{PaymentNotifier, UserRepository};

#[derive(Debug, Clone)]
pub struct SubmitPaymentCommand {
    pub uid: UserId,
    pub submission: PaymentSubmission,
    pub now: Timestamp,
}

/// Records a PENDING payment for the caller and acknowledges it by email.
pub struct SubmitPaymentHandler {
    users: Arc<dyn UserRepository>,
    store: PaymentStore,
    notifier: Arc<dyn PaymentNotifier>,
}

impl SubmitPaymentHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        store: PaymentStore,
        notifier: Arc<dyn PaymentNotifier>,
    ) -> Self {
        Self {
            users,
            store,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: SubmitPaymentCommand) -> Result<Payment, PaymentError> {
        let payer = self
            .users
            .find_by_id(&cmd.uid)
            .await?
            .ok_or_else(|| PaymentError::payer_not_found(cmd.uid.clone()))?;

        let payment = self
            .store
            .submit(payer.id, &payer.email, payer.team_id, cmd.submission, cmd.now)
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            uid = %payment.uid,
            plan = %payment.plan_requested,
            "Payment submitted"
        );

        if let Err(e) = self.notifier.payment_submitted(&payment).await {
            tracing::warn!(payment_id = %payment.id, error = %e, "Submission notification failed");
        }

        Ok(payment)
    }
}
