//! Payments

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a payment was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash in hand.
    Cash,

    /// Paper check; needs a check number and, to settle, a photo.
    Check,

    /// Card charged through the payment processor.
    Card,
}

impl PaymentMethod {
    /// All payment methods.
    pub const ALL: [Self; 3] = [Self::Cash, Self::Check, Self::Card];

    /// Stored/serialized representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Check => "check",
            Self::Card => "card",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Errors parsing payment inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentParseError {
    /// Not one of cash, check or card.
    #[error("unknown payment method {0:?}")]
    UnknownMethod(String),

    /// Check numbers are non-empty and all digits.
    #[error("check number must be a non-empty string of digits")]
    InvalidCheckNumber,
}

impl FromStr for PaymentMethod {
    type Err = PaymentParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| PaymentParseError::UnknownMethod(value.to_string()))
    }
}

/// A check number as printed on the check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CheckNumber(String);

impl CheckNumber {
    /// Borrow the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CheckNumber {
    type Err = PaymentParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentParseError::InvalidCheckNumber);
        }

        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for CheckNumber {
    type Error = PaymentParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CheckNumber> for String {
    fn from(value: CheckNumber) -> Self {
        value.0
    }
}

impl Display for CheckNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// One entry in a job's append-only payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialPayment {
    /// Tender type.
    pub method: PaymentMethod,

    /// Amount applied to the job.
    pub amount: Decimal,

    /// Check number, for check payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<CheckNumber>,

    /// Processor charge id, for card payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Client key the card charge was submitted under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,

    /// When the payment was recorded.
    pub recorded_at: Timestamp,
}

/// A payment about to be applied to a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Tender type.
    pub method: PaymentMethod,

    /// Amount to apply.
    pub amount: Decimal,

    /// Required for [`PaymentMethod::Check`].
    pub check_number: Option<CheckNumber>,

    /// Processor charge id; re-applying a payment with a known reference is a no-op.
    pub reference: Option<String>,

    /// Client key for the charge; a known key is also a no-op.
    pub idempotency_key: Option<String>,
}

impl NewPayment {
    /// A cash payment.
    #[must_use]
    pub fn cash(amount: Decimal) -> Self {
        Self {
            method: PaymentMethod::Cash,
            amount,
            check_number: None,
            reference: None,
            idempotency_key: None,
        }
    }

    /// A check payment.
    #[must_use]
    pub fn check(amount: Decimal, check_number: Option<CheckNumber>) -> Self {
        Self {
            method: PaymentMethod::Check,
            amount,
            check_number,
            reference: None,
            idempotency_key: None,
        }
    }

    /// A card payment confirmed by the processor under `reference`.
    #[must_use]
    pub fn card(amount: Decimal, reference: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Card,
            amount,
            check_number: None,
            reference: Some(reference.into()),
            idempotency_key: None,
        }
    }

    /// Tag the payment with the client key it was submitted under.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn check_number_requires_digits() -> TestResult {
        assert_eq!("001234".parse::<CheckNumber>()?.as_str(), "001234");
        assert_eq!(" 42 ".parse::<CheckNumber>()?.as_str(), "42");

        assert_eq!(
            "".parse::<CheckNumber>(),
            Err(PaymentParseError::InvalidCheckNumber)
        );
        assert_eq!(
            "12a4".parse::<CheckNumber>(),
            Err(PaymentParseError::InvalidCheckNumber)
        );

        Ok(())
    }

    #[test]
    fn partial_payment_serializes_amount_as_string() -> TestResult {
        let payment = PartialPayment {
            method: PaymentMethod::Check,
            amount: Decimal::new(6000, 2),
            check_number: Some("1001".parse()?),
            reference: None,
            idempotency_key: None,
            recorded_at: Timestamp::UNIX_EPOCH,
        };

        let value = serde_json::to_value(&payment)?;

        assert_eq!(value["method"], "check");
        assert_eq!(value["amount"], "60.00");
        assert_eq!(value["check_number"], "1001");
        assert!(value.get("reference").is_none(), "absent refs are omitted");

        let decoded: PartialPayment = serde_json::from_value(value)?;

        assert_eq!(decoded, payment);

        Ok(())
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert_eq!(
            "bitcoin".parse::<PaymentMethod>(),
            Err(PaymentParseError::UnknownMethod("bitcoin".to_string()))
        );
    }
}
