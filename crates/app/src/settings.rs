//! Billing and time clock settings shared by the services.

use std::time::Duration;

use fieldwork::{
    jobs::TaxRate,
    money::{DEFAULT_MIN_CARD_CHARGE, MoneyError, currency},
};
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};

/// Knobs that change how money and punches are handled.
#[derive(Debug, Clone, Copy)]
pub struct BillingSettings {
    /// Sales tax applied to taxable invoices.
    pub tax_rate: TaxRate,

    /// Smallest amount the payment processor will charge.
    pub min_card_charge: Decimal,

    /// Currency amounts are charged and formatted in.
    pub currency: &'static Currency,

    /// Attempts for a job write that keeps losing the version race, and for recording a
    /// confirmed card charge.
    pub record_attempts: u32,

    /// Base delay between recording attempts; the n-th retry waits `n * retry_backoff`.
    pub retry_backoff: Duration,

    /// Reject clock-in while the technician already has an open shift.
    pub enforce_single_open_shift: bool,
}

impl BillingSettings {
    /// Settings for the given ISO currency code, other values defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::UnknownCurrency`] for unknown codes.
    pub fn for_currency(code: &str) -> Result<Self, MoneyError> {
        Ok(Self {
            currency: currency(code)?,
            ..Self::default()
        })
    }
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::DEFAULT,
            min_card_charge: DEFAULT_MIN_CARD_CHARGE,
            currency: iso::USD,
            record_attempts: 5,
            retry_backoff: Duration::from_millis(200),
            enforce_single_open_shift: false,
        }
    }
}
