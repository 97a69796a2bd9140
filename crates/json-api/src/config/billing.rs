//! Billing Config

use std::time::Duration;

use clap::Args;
use fieldwork::{
    jobs::{InvoiceError, TaxRate},
    money::{MoneyError, currency},
};
use fieldwork_app::settings::BillingSettings;
use rust_decimal::Decimal;
use thiserror::Error;

/// Invalid billing settings.
#[derive(Debug, Error)]
pub enum BillingConfigError {
    /// `TAX_RATE` is not a fraction in `[0, 1]`.
    #[error("invalid tax rate: {0}")]
    TaxRate(#[from] InvoiceError),

    /// `CURRENCY` is not an ISO 4217 code.
    #[error("invalid currency: {0}")]
    Currency(#[from] MoneyError),
}

/// Tax, card and time clock rules.
#[derive(Debug, Args)]
pub struct BillingConfig {
    /// Sales tax rate applied to taxable invoices, as a fraction
    #[arg(long, env = "TAX_RATE", default_value = "0.075")]
    pub tax_rate: Decimal,

    /// Smallest card charge the processor accepts
    #[arg(long, env = "MIN_CARD_CHARGE", default_value = "0.50")]
    pub min_card_charge: Decimal,

    /// ISO 4217 currency code
    #[arg(long, env = "CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Attempts to record a payment before giving up
    #[arg(long, env = "PAYMENT_RECORD_ATTEMPTS", default_value_t = 5_u32)]
    pub payment_record_attempts: u32,

    /// Base delay between payment recording attempts
    #[arg(long, env = "PAYMENT_RETRY_BACKOFF_MS", default_value_t = 200_u64)]
    pub payment_retry_backoff_ms: u64,

    /// Reject clock-in while the technician has an open shift
    #[arg(long, env = "ENFORCE_SINGLE_OPEN_SHIFT", default_value_t = false)]
    pub enforce_single_open_shift: bool,
}

impl BillingConfig {
    /// Validated service settings.
    ///
    /// # Errors
    ///
    /// Returns an error for an out-of-range tax rate or unknown currency.
    pub fn settings(&self) -> Result<BillingSettings, BillingConfigError> {
        Ok(BillingSettings {
            tax_rate: TaxRate::new(self.tax_rate)?,
            min_card_charge: self.min_card_charge,
            currency: currency(&self.currency)?,
            record_attempts: self.payment_record_attempts,
            retry_backoff: Duration::from_millis(self.payment_retry_backoff_ms),
            enforce_single_open_shift: self.enforce_single_open_shift,
        })
    }
}
