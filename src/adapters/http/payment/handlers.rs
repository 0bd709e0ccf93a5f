//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to the payment command/query handlers.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::payment::{
    AttachReceiptCommand, GetPaymentQuery, GetReceiptQuery, ListMyPaymentsQuery,
    ListPaymentsQuery, ReviewPaymentCommand, SubmitPaymentCommand,
};
use crate::domain::foundation::PaymentId;
use crate::domain::payment::{PaymentError, PaymentSubmission, Receipt};

use super::dto::{
    AttachReceiptRequest, PaymentDetailResponse, PaymentFilter, PaymentListResponse,
    PaymentResponse, ReceiptResponse, ReviewPaymentRequest, ReviewPaymentResponse,
    SubmitPaymentRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Payer endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payments - The caller's payments, newest first
pub async fn list_my_payments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let payments = state
        .list_my_payments_handler()
        .handle(ListMyPaymentsQuery { uid: account.id })
        .await?;

    Ok(Json(PaymentListResponse::from(payments)))
}

/// POST /api/payments - Submit a payment proof
pub async fn submit_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<SubmitPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;
    let submission = PaymentSubmission::try_from(request)?;

    let payment = state
        .submit_payment_handler()
        .handle(SubmitPaymentCommand {
            uid: account.id,
            submission,
            now: state.now(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// POST /api/payments/:id/receipt - Attach an uploaded receipt
pub async fn attach_receipt(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachReceiptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;
    let receipt = Receipt::new(request.blob_ref, request.filename, request.content_type)
        .map_err(PaymentError::from)?;

    state
        .attach_receipt_handler()
        .handle(AttachReceiptCommand {
            payment_id: PaymentId::from_uuid(id),
            uid: account.id,
            receipt,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/payments?status= - All payments, optionally by status
pub async fn list_payments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<PaymentFilter>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&user).await?;

    let payments = state
        .list_payments_handler()
        .handle(ListPaymentsQuery {
            status: filter.status,
        })
        .await?;

    Ok(Json(PaymentListResponse::from(payments)))
}

/// GET /api/admin/payments/:id - One payment with its payer
pub async fn get_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&user).await?;

    let detail = state
        .get_payment_handler()
        .handle(GetPaymentQuery {
            payment_id: PaymentId::from_uuid(id),
        })
        .await?;

    Ok(Json(PaymentDetailResponse::from(detail)))
}

/// GET /api/admin/payments/:id/receipt - Where the receipt is stored
pub async fn get_receipt(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_admin(&user).await?;

    let receipt = state
        .get_receipt_handler()
        .handle(GetReceiptQuery {
            payment_id: PaymentId::from_uuid(id),
        })
        .await?;

    Ok(Json(ReceiptResponse::from(receipt)))
}

/// POST /api/admin/payments/:id/review - Approve or reject
pub async fn review_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state.require_admin(&user).await?;

    let result = state
        .review_payment_handler()
        .handle(ReviewPaymentCommand {
            payment_id: PaymentId::from_uuid(id),
            decision: request.decision,
            note: request.note,
            reviewer_id: admin.id,
            now: state.now(),
        })
        .await?;

    Ok(Json(ReviewPaymentResponse::from(result)))
}
