//! Payment record store.
//!
//! Owns the payment lifecycle on top of `PaymentRepository`. `review` is the
//! only code path that changes a payment's status, and it commits through
//! the repository's conditional write so concurrent reviews of one payment
//! cannot both succeed.

use std::sync::Arc;

use crate::domain::foundation::{PaymentId, TeamId, Timestamp, UserId};
use crate::domain::payment::{Payment, PaymentError, PaymentSubmission, Receipt, ReviewDecision};
use crate::ports::{PaymentRepository, TransitionOutcome};

#[derive(Clone)]
pub struct PaymentStore {
    repository: Arc<dyn PaymentRepository>,
}

impl PaymentStore {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    /// Creates and persists a PENDING payment.
    ///
    /// `team_id` is the submitter's team right now; it is stored as a
    /// snapshot and never re-read.
    pub async fn submit(
        &self,
        uid: UserId,
        payer_email: &str,
        team_id: Option<TeamId>,
        submission: PaymentSubmission,
        now: Timestamp,
    ) -> Result<Payment, PaymentError> {
        let payment = Payment::submit(PaymentId::new(), uid, payer_email, team_id, submission, now)?;
        self.repository.insert(&payment).await?;
        Ok(payment)
    }

    /// Sets the receipt of a payment owned by `uid`, replacing any earlier one.
    pub async fn attach_receipt(
        &self,
        payment_id: PaymentId,
        uid: &UserId,
        receipt: Receipt,
    ) -> Result<(), PaymentError> {
        if self
            .repository
            .set_receipt(&payment_id, uid, &receipt)
            .await?
        {
            Ok(())
        } else {
            Err(PaymentError::not_found(payment_id))
        }
    }

    /// Moves a PENDING payment to the decided status.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no payment has this id
    /// - `AlreadyReviewed` if it is not PENDING, including when another
    ///   review committed between our read and our write
    pub async fn review(
        &self,
        payment_id: PaymentId,
        decision: ReviewDecision,
        note: Option<String>,
        reviewer_id: UserId,
        now: Timestamp,
    ) -> Result<Payment, PaymentError> {
        let mut payment = self
            .repository
            .find_by_id(&payment_id)
            .await?
            .ok_or_else(|| PaymentError::not_found(payment_id))?;

        payment.review(decision, note, reviewer_id, now)?;

        match self.repository.transition_from_pending(&payment).await? {
            TransitionOutcome::Applied => Ok(payment),
            TransitionOutcome::NotFound => Err(PaymentError::not_found(payment_id)),
            TransitionOutcome::NotPending => {
                let status = self
                    .repository
                    .find_by_id(&payment_id)
                    .await?
                    .map_or(payment.status, |stored| stored.status);
                Err(PaymentError::already_reviewed(payment_id, status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPaymentRepository;
    use crate::domain::entitlement::PaidPlan;
    use crate::domain::foundation::DomainError;
    use crate::domain::payment::{BillingMonth, Currency, Money, PaymentChannel, PaymentStatus};
    use async_trait::async_trait;

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2026-04-10T12:00:00Z").unwrap()
    }

    fn submission() -> PaymentSubmission {
        PaymentSubmission {
            plan_requested: PaidPlan::Standard,
            channel: PaymentChannel::Moncash,
            bank_name: None,
            amount: Money::new(100_000, Currency::Htg).unwrap(),
            billing_month: BillingMonth::parse("2026-04").unwrap(),
            reference: "MC-1".into(),
        }
    }

    fn uid() -> UserId {
        UserId::new("payer").unwrap()
    }

    fn admin() -> UserId {
        UserId::new("admin").unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // submit / attach_receipt
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn submit_persists_pending_payment_with_team_snapshot() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let store = PaymentStore::new(repo.clone());
        let team = TeamId::new();

        let payment = store
            .submit(uid(), "payer@kantik.ht", Some(team), submission(), now())
            .await
            .unwrap();

        let stored = repo.get(&payment.id).unwrap();
        assert_eq!(stored.status, PaymentStatus::Pending);
        assert_eq!(stored.team_id, Some(team));
        assert_eq!(stored.created_at, now());
    }

    #[tokio::test]
    async fn attach_receipt_by_non_owner_is_not_found() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let store = PaymentStore::new(repo);
        let payment = store
            .submit(uid(), "payer@kantik.ht", None, submission(), now())
            .await
            .unwrap();

        let err = store
            .attach_receipt(
                payment.id,
                &UserId::new("someone-else").unwrap(),
                Receipt::new("blob", "r.png", "image/png").unwrap(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, PaymentError::not_found(payment.id));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // review
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn review_unknown_payment_is_not_found() {
        let store = PaymentStore::new(Arc::new(InMemoryPaymentRepository::new()));
        let id = PaymentId::new();

        let err = store
            .review(id, ReviewDecision::Approved, None, admin(), now())
            .await
            .unwrap_err();

        assert_eq!(err, PaymentError::not_found(id));
    }

    #[tokio::test]
    async fn second_review_fails_with_already_reviewed() {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let store = PaymentStore::new(repo.clone());
        let payment = store
            .submit(uid(), "payer@kantik.ht", None, submission(), now())
            .await
            .unwrap();

        store
            .review(payment.id, ReviewDecision::Rejected, Some("blurry".into()), admin(), now())
            .await
            .unwrap();
        let err = store
            .review(payment.id, ReviewDecision::Approved, None, admin(), now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PaymentError::AlreadyReviewed { status: PaymentStatus::Rejected, .. }
        ));
        let stored = repo.get(&payment.id).unwrap();
        assert_eq!(stored.status, PaymentStatus::Rejected);
        assert_eq!(stored.note.as_deref(), Some("blurry"));
    }

    /// Reads always report PENDING; the conditional write reports the race.
    struct RacingRepository {
        payment: Payment,
    }

    #[async_trait]
    impl PaymentRepository for RacingRepository {
        async fn insert(&self, _: &Payment) -> Result<(), DomainError> {
            Ok(())
        }
        async fn find_by_id(&self, _: &PaymentId) -> Result<Option<Payment>, DomainError> {
            Ok(Some(self.payment.clone()))
        }
        async fn list_by_user(&self, _: &UserId) -> Result<Vec<Payment>, DomainError> {
            Ok(vec![])
        }
        async fn list(&self, _: Option<PaymentStatus>) -> Result<Vec<Payment>, DomainError> {
            Ok(vec![])
        }
        async fn set_receipt(
            &self,
            _: &PaymentId,
            _: &UserId,
            _: &Receipt,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }
        async fn transition_from_pending(
            &self,
            _: &Payment,
        ) -> Result<TransitionOutcome, DomainError> {
            Ok(TransitionOutcome::NotPending)
        }
        async fn count_by_status(&self, _: PaymentStatus) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn lost_race_on_conditional_write_is_already_reviewed() {
        let payment = Payment::submit(
            PaymentId::new(),
            uid(),
            "payer@kantik.ht",
            None,
            submission(),
            now(),
        )
        .unwrap();
        let store = PaymentStore::new(Arc::new(RacingRepository {
            payment: payment.clone(),
        }));

        let err = store
            .review(payment.id, ReviewDecision::Approved, None, admin(), now())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyReviewed { .. }));
    }
}
