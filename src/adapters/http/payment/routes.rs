//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    attach_receipt, get_payment, get_receipt, list_my_payments, list_payments, review_payment,
    submit_payment,
};
use crate::adapters::http::state::AppState;

/// Payer routes, mounted at `/api/payments`.
///
/// - `GET /` - List the caller's payments
/// - `POST /` - Submit a payment proof
/// - `POST /:id/receipt` - Attach a receipt
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_payments).post(submit_payment))
        .route("/:id/receipt", post(attach_receipt))
}

/// Admin routes, mounted at `/api/admin/payments`.
///
/// - `GET /?status=` - List payments
/// - `GET /:id` - Payment detail with payer
/// - `GET /:id/receipt` - Receipt location
/// - `POST /:id/review` - Approve or reject
pub fn admin_payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments))
        .route("/:id", get(get_payment))
        .route("/:id/receipt", get(get_receipt))
        .route("/:id/review", post(review_payment))
}
