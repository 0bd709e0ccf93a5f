//! AttachReceiptHandler - attaches an uploaded receipt to the caller's payment.

use super::PaymentStore;
use crate::domain::foundation::{PaymentId, UserId};
use crate::domain::payment::{PaymentError, Receipt};

#[derive(Debug, Clone)]
pub struct AttachReceiptCommand {
    pub payment_id: PaymentId,
    pub uid: UserId,
    pub receipt: Receipt,
}

pub struct AttachReceiptHandler {
    store: PaymentStore,
}

impl AttachReceiptHandler {
    pub fn new(store: PaymentStore) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: AttachReceiptCommand) -> Result<(), PaymentError> {
        self.store
            .attach_receipt(cmd.payment_id, &cmd.uid, cmd.receipt)
            .await?;
        tracing::info!(payment_id = %cmd.payment_id, uid = %cmd.uid, "Receipt attached");
        Ok(())
    }
}
