//! Resend-backed payment notifier.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::templates::{self, EmailLinks, RenderedEmail};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::payment::Payment;
use crate::ports::PaymentNotifier;

const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends payment emails through the Resend HTTP API.
pub struct ResendNotifier {
    api_key: SecretString,
    from: String,
    links: EmailLinks,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl ResendNotifier {
    pub fn new(api_key: SecretString, from: impl Into<String>, links: EmailLinks) -> Self {
        Self {
            api_key,
            from: from.into(),
            links,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    async fn send(&self, to: &str, email: RenderedEmail) -> Result<(), DomainError> {
        let url = format!("{}/emails", self.api_base_url.trim_end_matches('/'));
        let body = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::new(ErrorCode::NotificationFailed, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Resend send failed");
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                format!("Resend API error ({}): {}", status, error_text),
            ));
        }

        tracing::debug!(to = %to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl PaymentNotifier for ResendNotifier {
    async fn payment_submitted(&self, payment: &Payment) -> Result<(), DomainError> {
        self.send(
            &payment.payer_email,
            templates::payment_submitted(payment, &self.links),
        )
        .await
    }

    async fn payment_approved(
        &self,
        payment: &Payment,
        expires_at: Timestamp,
    ) -> Result<(), DomainError> {
        self.send(
            &payment.payer_email,
            templates::payment_approved(payment, expires_at, &self.links),
        )
        .await
    }

    async fn payment_rejected(&self, payment: &Payment) -> Result<(), DomainError> {
        self.send(
            &payment.payer_email,
            templates::payment_rejected(payment, &self.links),
        )
        .await
    }
}
