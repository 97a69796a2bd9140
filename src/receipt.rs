//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{
    jobs::{Job, JobUuid, LineItem, PartialPayment},
    money::format_amount,
};

/// Errors rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Receipts are only issued for priced jobs.
    #[error("job {0} has no authorized price")]
    Unpriced(JobUuid),

    /// Writing the receipt failed.
    #[error("IO error")]
    IO(#[source] io::Error),
}

/// Customer-facing receipt for a job.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    job: &'a Job,
    price: Decimal,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Receipt for a priced job.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Unpriced`] when the job has not been authorized.
    pub fn for_job(job: &'a Job, currency: &'static Currency) -> Result<Self, ReceiptError> {
        let price = job.price.ok_or(ReceiptError::Unpriced(job.uuid))?;

        Ok(Self {
            job,
            price,
            currency,
        })
    }

    /// Sum of line items before tax.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.job.line_items.iter().map(|item| item.unit_price).sum()
    }

    /// Tax charged, zero when untaxed.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.job.tax_amount.unwrap_or_default()
    }

    /// Authorized total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price
    }

    /// Amount paid so far.
    #[must_use]
    pub fn paid(&self) -> Decimal {
        self.job.total_paid()
    }

    /// Amount still owed.
    #[must_use]
    pub fn balance_due(&self) -> Decimal {
        self.job.remaining_balance()
    }

    /// Subject line for notifications.
    #[must_use]
    pub fn subject(&self) -> String {
        if self.balance_due().is_zero() {
            format!("Receipt for {}", self.job.description)
        } else {
            format!("Payment received for {}", self.job.description)
        }
    }

    /// Write the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Amount"]);

        for item in &self.job.line_items {
            builder.push_record(self.item_row(item));
        }

        let payments_from = self.job.line_items.len() + 1;

        for payment in &self.job.partial_payments {
            builder.push_record(self.payment_row(payment));
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        if !self.job.partial_payments.is_empty() {
            theme.insert_horizontal_line(payments_from, separator);
        }

        table.with(theme);
        table.modify(Columns::last(), Alignment::right());

        writeln!(out, "{}", self.job.customer.name).map_err(ReceiptError::IO)?;
        writeln!(out, "{}", self.job.description).map_err(ReceiptError::IO)?;
        writeln!(out, "{table}").map_err(ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    /// Render to a string, for message bodies.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if rendering fails.
    pub fn to_text(&self) -> Result<String, ReceiptError> {
        let mut out = Vec::new();

        self.write_to(&mut out)?;

        String::from_utf8(out).map_err(|err| {
            ReceiptError::IO(io::Error::new(io::ErrorKind::InvalidData, err))
        })
    }

    fn item_row(&self, item: &LineItem) -> [String; 2] {
        [
            item.description.clone(),
            format_amount(item.unit_price, self.currency),
        ]
    }

    fn payment_row(&self, payment: &PartialPayment) -> [String; 2] {
        let label = match &payment.check_number {
            Some(number) => format!("Paid by {} #{number}", payment.method),
            None => format!("Paid by {}", payment.method),
        };

        [label, format!("-{}", format_amount(payment.amount, self.currency))]
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut lines = vec![("Subtotal", self.subtotal())];

        if self.job.taxable {
            lines.push(("Tax", self.tax()));
        }

        lines.push(("Total", self.total()));
        lines.push(("Paid", self.paid()));
        lines.push(("Balance due", self.balance_due()));

        let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        for (label, amount) in lines {
            writeln!(
                out,
                "{label:>label_width$}: {}",
                format_amount(amount, self.currency)
            )
            .map_err(ReceiptError::IO)?;
        }

        Ok(())
    }
}
