//! Bilingual (French / English) payment email templates.

use crate::domain::foundation::Timestamp;
use crate::domain::payment::Payment;

/// Links embedded in every email footer.
#[derive(Debug, Clone)]
pub struct EmailLinks {
    pub app_base_url: String,
    pub support_email: String,
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn payment_submitted(payment: &Payment, links: &EmailLinks) -> RenderedEmail {
    let text = format!(
        "Nous avons bien reçu votre paiement. Il sera vérifié sous peu.\n\
         We received your payment. It will be reviewed shortly.\n\n\
         Plan: {plan}\n\
         Channel: {channel}\n\
         Amount: {amount}\n\
         Billing month: {month}\n\
         Reference: {reference}\n\n\
         {footer}",
        plan = payment.plan_requested,
        channel = payment.channel,
        amount = payment.amount,
        month = payment.billing_month,
        reference = payment.reference,
        footer = footer(links),
    );
    render(
        "Paiement reçu, en attente de validation | Payment received, pending review",
        text,
    )
}

pub fn payment_approved(payment: &Payment, expires_at: Timestamp, links: &EmailLinks) -> RenderedEmail {
    let text = format!(
        "Votre paiement a été approuvé. Votre abonnement {plan} est actif.\n\
         Your payment was approved. Your {plan} subscription is active.\n\n\
         Valid until: {expires}\n\
         Library: {base}/library\n\n\
         {footer}",
        plan = payment.plan_requested,
        expires = expires_at.as_datetime().format("%Y-%m-%d"),
        base = links.app_base_url.trim_end_matches('/'),
        footer = footer(links),
    );
    render(
        "Paiement approuvé, abonnement activé | Payment approved, subscription activated",
        text,
    )
}

pub fn payment_rejected(payment: &Payment, links: &EmailLinks) -> RenderedEmail {
    let note = payment
        .note
        .as_deref()
        .unwrap_or("Aucune raison fournie / No reason given");
    let text = format!(
        "Votre paiement pour le plan {plan} n'a pas pu être validé.\n\
         Your payment for the {plan} plan could not be validated.\n\n\
         Note: {note}\n\
         Resubmit: {base}/pricing\n\n\
         {footer}",
        plan = payment.plan_requested,
        note = note,
        base = links.app_base_url.trim_end_matches('/'),
        footer = footer(links),
    );
    render(
        "Paiement rejeté, action requise | Payment rejected, action required",
        text,
    )
}

fn footer(links: &EmailLinks) -> String {
    format!("Support: {}\nKantik", links.support_email)
}

fn render(subject: &str, text: String) -> RenderedEmail {
    let html = format!(
        "<!DOCTYPE html><html><body><pre style=\"font-family:sans-serif\">{}</pre></body></html>",
        escape_html(&text)
    );
    RenderedEmail {
        subject: subject.to_string(),
        html,
        text,
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::PaidPlan;
    use crate::domain::foundation::{PaymentId, UserId};
    use crate::domain::payment::{
        BillingMonth, Currency, Money, PaymentChannel, PaymentSubmission, ReviewDecision,
    };

    fn links() -> EmailLinks {
        EmailLinks {
            app_base_url: "https://kantik.ht/".to_string(),
            support_email: "support@kantik.ht".to_string(),
        }
    }

    fn payment() -> Payment {
        Payment::submit(
            PaymentId::new(),
            UserId::new("u").unwrap(),
            "u@kantik.ht",
            None,
            PaymentSubmission {
                plan_requested: PaidPlan::Standard,
                channel: PaymentChannel::Moncash,
                bank_name: None,
                amount: Money::new(75_000, Currency::Htg).unwrap(),
                billing_month: BillingMonth::parse("2026-08").unwrap(),
                reference: "MC-<1>".to_string(),
            },
            Timestamp::parse_rfc3339("2026-08-01T00:00:00Z").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn submitted_lists_payment_details() {
        let email = payment_submitted(&payment(), &links());
        assert!(email.text.contains("750.00 HTG"));
        assert!(email.text.contains("2026-08"));
        assert!(email.text.contains("support@kantik.ht"));
    }

    #[test]
    fn html_body_is_escaped() {
        let email = payment_submitted(&payment(), &links());
        assert!(email.html.contains("MC-&lt;1&gt;"));
        assert!(!email.html.contains("MC-<1>"));
    }

    #[test]
    fn approved_shows_expiry_date() {
        let expires = Timestamp::parse_rfc3339("2026-09-01T10:00:00Z").unwrap();
        let email = payment_approved(&payment(), expires, &links());
        assert!(email.text.contains("2026-09-01"));
        assert!(email.text.contains("https://kantik.ht/library"));
    }

    #[test]
    fn rejected_includes_note_or_placeholder() {
        let mut p = payment();
        assert!(payment_rejected(&p, &links()).text.contains("No reason given"));

        p.review(
            ReviewDecision::Rejected,
            Some("Receipt unreadable".into()),
            UserId::new("admin").unwrap(),
            Timestamp::now(),
        )
        .unwrap();
        assert!(payment_rejected(&p, &links()).text.contains("Receipt unreadable"));
    }
}
