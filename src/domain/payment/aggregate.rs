//! Payment aggregate.
//!
//! A payment is a proof of transfer submitted by a user and decided once by
//! an administrator. `review` is the only mutator of `status`.
//!
//! # Invariants
//!
//! - `status` only moves PENDING → APPROVED or PENDING → REJECTED
//! - `reviewed_by` and `reviewed_at` are set iff the payment is reviewed
//! - `team_id` is the payer's team at submission time and never changes

use serde::{Deserialize, Serialize};

use super::errors::PaymentError;
use super::status::{PaymentStatus, ReviewDecision};
use super::values::{BillingMonth, Money, PaymentChannel, Receipt};
use crate::domain::entitlement::PaidPlan;
use crate::domain::foundation::{PaymentId, StateMachine, TeamId, Timestamp, UserId};

/// Fields supplied by the payer on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSubmission {
    pub plan_requested: PaidPlan,
    pub channel: PaymentChannel,
    pub bank_name: Option<String>,
    pub amount: Money,
    pub billing_month: BillingMonth,
    pub reference: String,
}

/// A submitted payment proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub uid: UserId,

    /// Notification recipient, captured at submission.
    pub payer_email: String,

    /// Payer's team when the payment was submitted.
    pub team_id: Option<TeamId>,

    pub plan_requested: PaidPlan,
    pub channel: PaymentChannel,
    pub bank_name: Option<String>,
    pub amount: Money,
    pub billing_month: BillingMonth,
    pub reference: String,
    pub receipt: Option<Receipt>,
    pub status: PaymentStatus,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<Timestamp>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl Payment {
    /// Creates a PENDING payment for `uid`.
    pub fn submit(
        id: PaymentId,
        uid: UserId,
        payer_email: impl Into<String>,
        team_id: Option<TeamId>,
        submission: PaymentSubmission,
        now: Timestamp,
    ) -> Result<Self, PaymentError> {
        let reference = submission.reference.trim().to_string();
        if reference.is_empty() {
            return Err(PaymentError::validation("reference", "reference is required"));
        }
        let bank_name = submission
            .bank_name
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        Ok(Self {
            id,
            uid,
            payer_email: payer_email.into(),
            team_id,
            plan_requested: submission.plan_requested,
            channel: submission.channel,
            bank_name,
            amount: submission.amount,
            billing_month: submission.billing_month,
            reference,
            receipt: None,
            status: PaymentStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            note: None,
            created_at: now,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Replaces any previously attached receipt.
    pub fn attach_receipt(&mut self, receipt: Receipt) {
        self.receipt = Some(receipt);
    }

    /// Applies a review decision.
    ///
    /// Fails with `AlreadyReviewed` if the payment left PENDING earlier.
    pub fn review(
        &mut self,
        decision: ReviewDecision,
        note: Option<String>,
        reviewer: UserId,
        now: Timestamp,
    ) -> Result<(), PaymentError> {
        let target = decision.target_status();
        if !self.status.can_transition_to(&target) {
            return Err(PaymentError::already_reviewed(self.id, self.status));
        }
        self.status = target;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        self.note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Currency;

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2026-04-02T09:30:00Z").unwrap()
    }

    fn submission() -> PaymentSubmission {
        PaymentSubmission {
            plan_requested: PaidPlan::Team,
            channel: PaymentChannel::Moncash,
            bank_name: Some("  ".to_string()),
            amount: Money::new(250_000, Currency::Htg).unwrap(),
            billing_month: BillingMonth::parse("2026-04").unwrap(),
            reference: " MC-7781 ".to_string(),
        }
    }

    fn pending() -> Payment {
        Payment::submit(
            PaymentId::new(),
            UserId::new("payer").unwrap(),
            "payer@kantik.ht",
            Some(TeamId::new()),
            submission(),
            now(),
        )
        .unwrap()
    }

    fn admin() -> UserId {
        UserId::new("admin").unwrap()
    }

    #[test]
    fn submit_starts_pending_without_review_fields() {
        let p = pending();
        assert!(p.is_pending());
        assert!(p.reviewed_by.is_none());
        assert!(p.reviewed_at.is_none());
        assert!(p.receipt.is_none());
        assert_eq!(p.reference, "MC-7781");
        assert!(p.bank_name.is_none());
    }

    #[test]
    fn submit_requires_reference() {
        let mut sub = submission();
        sub.reference = "   ".to_string();
        let err = Payment::submit(
            PaymentId::new(),
            UserId::new("payer").unwrap(),
            "payer@kantik.ht",
            None,
            sub,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, PaymentError::ValidationFailed { .. }));
    }

    #[test]
    fn review_sets_status_and_reviewer() {
        let mut p = pending();
        p.review(ReviewDecision::Approved, Some("ok".into()), admin(), now())
            .unwrap();
        assert_eq!(p.status, PaymentStatus::Approved);
        assert_eq!(p.reviewed_by, Some(admin()));
        assert_eq!(p.reviewed_at, Some(now()));
        assert_eq!(p.note.as_deref(), Some("ok"));
    }

    #[test]
    fn second_review_is_rejected_without_changes() {
        let mut p = pending();
        p.review(ReviewDecision::Rejected, Some("blurry".into()), admin(), now())
            .unwrap();
        let before = p.clone();

        let err = p
            .review(ReviewDecision::Approved, None, admin(), now().plus_days(1))
            .unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyReviewed { .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn attach_receipt_overwrites_previous() {
        let mut p = pending();
        p.attach_receipt(Receipt::new("blob-1", "a.jpg", "image/jpeg").unwrap());
        p.attach_receipt(Receipt::new("blob-2", "b.jpg", "image/jpeg").unwrap());
        assert_eq!(p.receipt.unwrap().blob_ref, "blob-2");
    }
}
