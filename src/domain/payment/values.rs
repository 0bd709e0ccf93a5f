//! Value objects carried by a payment submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Channel the payer used to send money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentChannel {
    Moncash,
    BankTransfer,
}

impl PaymentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentChannel::Moncash => "MONCASH",
            PaymentChannel::BankTransfer => "BANK_TRANSFER",
        }
    }
}

impl FromStr for PaymentChannel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MONCASH" => Ok(PaymentChannel::Moncash),
            "BANK_TRANSFER" => Ok(PaymentChannel::BankTransfer),
            other => Err(ValidationError::invalid_format(
                "channel",
                format!("unknown payment channel '{}'", other),
            )),
        }
    }
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Htg,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Htg => "HTG",
            Currency::Usd => "USD",
        }
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTG" => Ok(Currency::Htg),
            "USD" => Ok(Currency::Usd),
            other => Err(ValidationError::invalid_format(
                "currency",
                format!("unsupported currency '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount in minor units of its currency.
///
/// Display only; the service never computes with money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount_cents: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount_cents: i64, currency: Currency) -> Result<Self, ValidationError> {
        if amount_cents <= 0 {
            return Err(ValidationError::out_of_range(
                "amount_cents",
                1,
                i64::MAX,
                amount_cents,
            ));
        }
        Ok(Self {
            amount_cents,
            currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_cents / 100,
            self.amount_cents % 100,
            self.currency
        )
    }
}

/// Month a payment covers, formatted `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth(String);

impl BillingMonth {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        let invalid = || ValidationError::invalid_format("billing_month", "expected YYYY-MM");
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: u32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(2000..=2999).contains(&year) {
            return Err(ValidationError::out_of_range("billing_month", 2000, 2999, year as i64));
        }
        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range("billing_month", 1, 12, month as i64));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BillingMonth::parse(&value)
    }
}

impl From<BillingMonth> for String {
    fn from(month: BillingMonth) -> Self {
        month.0
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pointer to an uploaded receipt held by the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub blob_ref: String,
    pub filename: String,
    pub content_type: String,
}

impl Receipt {
    pub fn new(
        blob_ref: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let blob_ref = blob_ref.into();
        if blob_ref.trim().is_empty() {
            return Err(ValidationError::empty_field("blob_ref"));
        }
        let filename = filename.into();
        let content_type = content_type.into();
        Ok(Self {
            blob_ref,
            filename: if filename.trim().is_empty() {
                "receipt".to_string()
            } else {
                filename
            },
            content_type: if content_type.trim().is_empty() {
                "application/octet-stream".to_string()
            } else {
                content_type
            },
        })
    }
}
