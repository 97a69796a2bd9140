//! Invoice

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    jobs::{job::Job, status::JobStatus},
    money::round_cents,
};

/// Errors raised while pricing or authorizing a job.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    /// No line items were given.
    #[error("an invoice needs at least one line item")]
    EmptyInvoice,

    /// The items sum to zero or less.
    #[error("invoice total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// Closed jobs cannot be re-priced.
    #[error("job is closed and cannot be re-authorized")]
    AlreadyClosed,

    /// Re-pricing below what has already been collected would break the ledger.
    #[error("new price {price} does not exceed the {paid} already paid")]
    BelowAmountPaid {
        /// Proposed price.
        price: Decimal,
        /// Sum of recorded payments.
        paid: Decimal,
    },

    /// Tax rates are fractions in `[0, 1]`.
    #[error("tax rate {0} must be between 0 and 1")]
    InvalidTaxRate(Decimal),
}

/// A billed line on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What was done or supplied.
    pub description: String,

    /// Price of the line.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Create a line item.
    pub fn new(description: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            unit_price,
        }
    }
}

/// Sales tax rate as a fraction, e.g. `0.075` for 7.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// 7.5%
    pub const DEFAULT: Self = Self(Decimal::from_parts(75, 0, 0, false, 3));

    /// Validate a tax rate.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::InvalidTaxRate`] unless `0 <= rate <= 1`.
    pub fn new(rate: Decimal) -> Result<Self, InvoiceError> {
        if rate.is_sign_negative() || rate > Decimal::ONE {
            return Err(InvoiceError::InvalidTaxRate(rate));
        }

        Ok(Self(rate))
    }

    /// The rate as a fraction.
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Computed invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Sum of unit prices, unrounded.
    pub subtotal: Decimal,

    /// Tax rounded to the cent; zero when not taxable.
    pub tax: Decimal,

    /// `subtotal + tax`, rounded to the cent.
    pub price: Decimal,
}

/// Price a list of line items.
///
/// # Errors
///
/// - [`InvoiceError::EmptyInvoice`]: `line_items` is empty.
/// - [`InvoiceError::NonPositiveTotal`]: the resulting price is zero or negative.
pub fn totals(
    line_items: &[LineItem],
    taxable: bool,
    rate: TaxRate,
) -> Result<InvoiceTotals, InvoiceError> {
    if line_items.is_empty() {
        return Err(InvoiceError::EmptyInvoice);
    }

    let subtotal: Decimal = line_items.iter().map(|item| item.unit_price).sum();

    let tax = if taxable {
        round_cents(subtotal * rate.as_decimal())
    } else {
        Decimal::ZERO
    };

    let price = round_cents(subtotal + tax);

    if price <= Decimal::ZERO {
        return Err(InvoiceError::NonPositiveTotal(price));
    }

    Ok(InvoiceTotals {
        subtotal,
        tax,
        price,
    })
}

impl Job {
    /// Record a signed price and move the job to `Authorized`.
    ///
    /// Re-authorizing an `Authorized` job replaces the price and tax, so parts can be added
    /// after the first signature.
    ///
    /// # Errors
    ///
    /// - [`InvoiceError::AlreadyClosed`]: the job is closed.
    /// - [`InvoiceError::EmptyInvoice`] / [`InvoiceError::NonPositiveTotal`]: see [`totals`].
    /// - [`InvoiceError::BelowAmountPaid`]: payments already meet or exceed the new price.
    pub fn authorize(
        &mut self,
        line_items: Vec<LineItem>,
        taxable: bool,
        rate: TaxRate,
        now: Timestamp,
    ) -> Result<InvoiceTotals, InvoiceError> {
        if self.status.is_terminal() {
            return Err(InvoiceError::AlreadyClosed);
        }

        let totals = totals(&line_items, taxable, rate)?;
        let paid = self.total_paid();

        if !self.partial_payments.is_empty() && totals.price <= paid {
            return Err(InvoiceError::BelowAmountPaid {
                price: totals.price,
                paid,
            });
        }

        self.line_items = line_items;
        self.price = Some(totals.price);
        self.taxable = taxable;
        self.tax_amount = taxable.then_some(totals.tax);
        self.status = JobStatus::Authorized;

        if !self.partial_payments.is_empty() {
            self.payment_amount = Some(paid);
        }

        self.updated_at = now;

        Ok(totals)
    }
}
