//! Payment command and query handlers.

mod attach_receipt;
mod get_payment;
mod list_payments;
mod payment_store;
mod review_payment;
mod submit_payment;

pub use attach_receipt::{AttachReceiptCommand, AttachReceiptHandler};
pub use get_payment::{
    GetPaymentHandler, GetPaymentQuery, GetReceiptHandler, GetReceiptQuery, PaymentDetail,
};
pub use list_payments::{
    ListMyPaymentsHandler, ListMyPaymentsQuery, ListPaymentsHandler, ListPaymentsQuery,
};
pub use payment_store::PaymentStore;
pub use review_payment::{ReviewPaymentCommand, ReviewPaymentHandler, ReviewPaymentResult};
pub use submit_payment::{SubmitPaymentCommand, SubmitPaymentHandler};
