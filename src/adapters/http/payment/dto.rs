//! Data Transfer Objects for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{PaymentDetail, ReviewPaymentResult};
use crate::domain::entitlement::{PaidPlan, Plan, UserAccount};
use crate::domain::foundation::{PaymentId, TeamId, Timestamp, UserId};
use crate::domain::payment::{
    BillingMonth, Currency, Money, Payment, PaymentChannel, PaymentError, PaymentStatus,
    PaymentSubmission, Receipt, ReviewDecision,
};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/payments`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPaymentRequest {
    pub plan_requested: Plan,
    pub channel: PaymentChannel,
    #[serde(default)]
    pub bank_name: Option<String>,
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Currency,
    pub billing_month: String,
    pub reference: String,
}

impl TryFrom<SubmitPaymentRequest> for PaymentSubmission {
    type Error = PaymentError;

    fn try_from(req: SubmitPaymentRequest) -> Result<Self, Self::Error> {
        Ok(PaymentSubmission {
            plan_requested: PaidPlan::try_from(req.plan_requested)?,
            channel: req.channel,
            bank_name: req.bank_name,
            amount: Money::new(req.amount_cents, req.currency)?,
            billing_month: BillingMonth::parse(&req.billing_month)?,
            reference: req.reference,
        })
    }
}

/// Body of `POST /api/payments/:id/receipt`. The upload itself goes to
/// blob storage; this records where it landed.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachReceiptRequest {
    pub blob_ref: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
}

/// Body of `POST /api/admin/payments/:id/review`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPaymentRequest {
    pub decision: ReviewDecision,
    #[serde(default)]
    pub note: Option<String>,
}

/// Query string of `GET /api/admin/payments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub uid: UserId,
    pub payer_email: String,
    pub team_id: Option<TeamId>,
    pub plan_requested: PaidPlan,
    pub channel: PaymentChannel,
    pub bank_name: Option<String>,
    pub amount_cents: i64,
    pub currency: Currency,
    pub amount_display: String,
    pub billing_month: String,
    pub reference: String,
    pub has_receipt: bool,
    pub status: PaymentStatus,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<Timestamp>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            uid: p.uid,
            payer_email: p.payer_email,
            team_id: p.team_id,
            plan_requested: p.plan_requested,
            channel: p.channel,
            bank_name: p.bank_name,
            amount_cents: p.amount.amount_cents,
            currency: p.amount.currency,
            amount_display: p.amount.to_string(),
            billing_month: p.billing_month.to_string(),
            reference: p.reference,
            has_receipt: p.receipt.is_some(),
            status: p.status,
            reviewed_by: p.reviewed_by,
            reviewed_at: p.reviewed_at,
            note: p.note,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentResponse>,
}

impl From<Vec<Payment>> for PaymentListResponse {
    fn from(payments: Vec<Payment>) -> Self {
        Self {
            payments: payments.into_iter().map(PaymentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetailResponse {
    pub payment: PaymentResponse,
    pub payer: Option<UserAccount>,
}

impl From<PaymentDetail> for PaymentDetailResponse {
    fn from(detail: PaymentDetail) -> Self {
        Self {
            payment: detail.payment.into(),
            payer: detail.payer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptResponse {
    pub blob_ref: String,
    pub filename: String,
    pub content_type: String,
}

impl From<Receipt> for ReceiptResponse {
    fn from(r: Receipt) -> Self {
        Self {
            blob_ref: r.blob_ref,
            filename: r.filename,
            content_type: r.content_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPaymentResponse {
    pub payment: PaymentResponse,
    /// New expiry of the payer. Absent on rejection.
    pub plan_expires_at: Option<Timestamp>,
    pub grace_until: Option<Timestamp>,
    /// Team members whose entitlement was refreshed.
    pub propagated_to: Vec<UserId>,
    pub propagation_failed: Vec<UserId>,
}

impl From<ReviewPaymentResult> for ReviewPaymentResponse {
    fn from(result: ReviewPaymentResult) -> Self {
        let (propagated_to, propagation_failed) = result
            .propagation
            .map(|r| (r.updated, r.failed))
            .unwrap_or_default();

        Self {
            payment: result.payment.into(),
            plan_expires_at: result.window.map(|w| w.expires_at),
            grace_until: result.window.map(|w| w.grace_until),
            propagated_to,
            propagation_failed,
        }
    }
}
