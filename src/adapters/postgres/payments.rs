//! PostgreSQL implementation of PaymentRepository.
//!
//! The review write is a single conditional UPDATE guarded by
//! `status = 'PENDING'`, so concurrent reviewers race on the row lock and
//! exactly one of them sees a row affected.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, parse_column, parse_user_id};
use crate::domain::entitlement::{PaidPlan, Plan};
use crate::domain::foundation::{DomainError, PaymentId, TeamId, Timestamp, UserId};
use crate::domain::payment::{BillingMonth, Money, Payment, PaymentStatus, Receipt};
use crate::ports::{PaymentRepository, TransitionOutcome};

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    uid: String,
    payer_email: String,
    team_id: Option<Uuid>,
    plan_requested: String,
    channel: String,
    bank_name: Option<String>,
    amount_cents: i64,
    currency: String,
    billing_month: String,
    reference: String,
    receipt_blob_ref: Option<String>,
    receipt_filename: Option<String>,
    receipt_content_type: Option<String>,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let plan: Plan = parse_column(&row.plan_requested)?;
        let plan_requested = PaidPlan::try_from(plan).map_err(|e| {
            DomainError::database(format!("Invalid plan_requested value: {}", e))
        })?;

        let amount = Money::new(row.amount_cents, parse_column(&row.currency)?)
            .map_err(|e| DomainError::database(format!("Invalid amount: {}", e)))?;

        let billing_month = BillingMonth::parse(&row.billing_month)
            .map_err(|e| DomainError::database(format!("Invalid billing_month: {}", e)))?;

        let receipt = match row.receipt_blob_ref {
            Some(blob_ref) => Some(
                Receipt::new(
                    blob_ref,
                    row.receipt_filename.unwrap_or_default(),
                    row.receipt_content_type.unwrap_or_default(),
                )
                .map_err(|e| DomainError::database(format!("Invalid receipt: {}", e)))?,
            ),
            None => None,
        };

        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            uid: parse_user_id(row.uid)?,
            payer_email: row.payer_email,
            team_id: row.team_id.map(TeamId::from_uuid),
            plan_requested,
            channel: parse_column(&row.channel)?,
            bank_name: row.bank_name,
            amount,
            billing_month,
            reference: row.reference,
            receipt,
            status: parse_column(&row.status)?,
            reviewed_by: row.reviewed_by.map(parse_user_id).transpose()?,
            reviewed_at: row.reviewed_at.map(Timestamp::from_datetime),
            note: row.note,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

const SELECT_PAYMENT: &str = r#"
    SELECT id, uid, payer_email, team_id, plan_requested, channel, bank_name,
           amount_cents, currency, billing_month, reference,
           receipt_blob_ref, receipt_filename, receipt_content_type,
           status, reviewed_by, reviewed_at, note, created_at
    FROM payments
"#;

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        let receipt = payment.receipt.as_ref();

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, uid, payer_email, team_id, plan_requested, channel, bank_name,
                amount_cents, currency, billing_month, reference,
                receipt_blob_ref, receipt_filename, receipt_content_type,
                status, reviewed_by, reviewed_at, note, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.uid.as_str())
        .bind(&payment.payer_email)
        .bind(payment.team_id.map(|t| *t.as_uuid()))
        .bind(payment.plan_requested.as_str())
        .bind(payment.channel.as_str())
        .bind(&payment.bank_name)
        .bind(payment.amount.amount_cents)
        .bind(payment.amount.currency.as_str())
        .bind(payment.billing_month.as_str())
        .bind(&payment.reference)
        .bind(receipt.map(|r| r.blob_ref.as_str()))
        .bind(receipt.map(|r| r.filename.as_str()))
        .bind(receipt.map(|r| r.content_type.as_str()))
        .bind(payment.status.as_str())
        .bind(payment.reviewed_by.as_ref().map(|u| u.as_str()))
        .bind(payment.reviewed_at.map(|t| *t.as_datetime()))
        .bind(&payment.note)
        .bind(payment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert payment", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{SELECT_PAYMENT} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find payment", e))?;

        row.map(Payment::try_from).transpose()
    }

    async fn list_by_user(&self, uid: &UserId) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{SELECT_PAYMENT} WHERE uid = $1 ORDER BY created_at DESC"
        ))
        .bind(uid.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list payments by user", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn list(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{SELECT_PAYMENT} WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn set_receipt(
        &self,
        id: &PaymentId,
        uid: &UserId,
        receipt: &Receipt,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                receipt_blob_ref = $3,
                receipt_filename = $4,
                receipt_content_type = $5
            WHERE id = $1 AND uid = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(uid.as_str())
        .bind(&receipt.blob_ref)
        .bind(&receipt.filename)
        .bind(&receipt.content_type)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("set receipt", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn transition_from_pending(
        &self,
        reviewed: &Payment,
    ) -> Result<TransitionOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = $2,
                reviewed_by = $3,
                reviewed_at = $4,
                note = $5
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(reviewed.id.as_uuid())
        .bind(reviewed.status.as_str())
        .bind(reviewed.reviewed_by.as_ref().map(|u| u.as_str()))
        .bind(reviewed.reviewed_at.map(|t| *t.as_datetime()))
        .bind(&reviewed.note)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("review payment", e))?;

        if result.rows_affected() == 1 {
            return Ok(TransitionOutcome::Applied);
        }

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM payments WHERE id = $1")
            .bind(reviewed.id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find payment", e))?;

        Ok(match exists {
            Some(_) => TransitionOutcome::NotPending,
            None => TransitionOutcome::NotFound,
        })
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count payments", e))?;

        Ok(count.max(0) as u64)
    }
}
