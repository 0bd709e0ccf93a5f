//! Notifiers that do not deliver email.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::{DomainError, PaymentId, Timestamp};
use crate::domain::payment::Payment;
use crate::ports::PaymentNotifier;

/// Logs notifications instead of sending them. Used when no email API key
/// is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl PaymentNotifier for LoggingNotifier {
    async fn payment_submitted(&self, payment: &Payment) -> Result<(), DomainError> {
        tracing::info!(
            payment_id = %payment.id,
            to = %payment.payer_email,
            plan = %payment.plan_requested,
            "Email disabled: payment submitted notification"
        );
        Ok(())
    }

    async fn payment_approved(
        &self,
        payment: &Payment,
        expires_at: Timestamp,
    ) -> Result<(), DomainError> {
        tracing::info!(
            payment_id = %payment.id,
            to = %payment.payer_email,
            expires_at = %expires_at,
            "Email disabled: payment approved notification"
        );
        Ok(())
    }

    async fn payment_rejected(&self, payment: &Payment) -> Result<(), DomainError> {
        tracing::info!(
            payment_id = %payment.id,
            to = %payment.payer_email,
            "Email disabled: payment rejected notification"
        );
        Ok(())
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    Submitted { payment_id: PaymentId, to: String },
    Approved { payment_id: PaymentId, to: String, expires_at: Timestamp },
    Rejected { payment_id: PaymentId, to: String, note: Option<String> },
}

/// Captures notifications for assertions; can be told to fail every call.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails (after being recorded).
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, notification: SentNotification) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
        if self.fail {
            return Err(DomainError::new(
                crate::domain::foundation::ErrorCode::NotificationFailed,
                "delivery failed",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentNotifier for RecordingNotifier {
    async fn payment_submitted(&self, payment: &Payment) -> Result<(), DomainError> {
        self.push(SentNotification::Submitted {
            payment_id: payment.id,
            to: payment.payer_email.clone(),
        })
    }

    async fn payment_approved(
        &self,
        payment: &Payment,
        expires_at: Timestamp,
    ) -> Result<(), DomainError> {
        self.push(SentNotification::Approved {
            payment_id: payment.id,
            to: payment.payer_email.clone(),
            expires_at,
        })
    }

    async fn payment_rejected(&self, payment: &Payment) -> Result<(), DomainError> {
        self.push(SentNotification::Rejected {
            payment_id: payment.id,
            to: payment.payer_email.clone(),
            note: payment.note.clone(),
        })
    }
}
