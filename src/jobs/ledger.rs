//! Payment Ledger
//!
//! Applies payments to a job and decides when it is settled. Every operation validates
//! completely before touching the job, so a rejected call leaves it exactly as it was.

use jiff::Timestamp;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::jobs::{
    job::Job,
    payments::{NewPayment, PartialPayment, PaymentMethod},
    status::JobStatus,
};

/// Reasons a payment or settlement step is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Amounts must be greater than zero.
    #[error("payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Amounts are whole cents.
    #[error("payment amount {0} has fractional cents")]
    SubCentAmount(Decimal),

    /// The payment would take the total paid above the price.
    #[error("payment of {amount} exceeds the remaining balance of {remaining}")]
    ExceedsBalance {
        /// Offered amount.
        amount: Decimal,
        /// Balance still owed.
        remaining: Decimal,
    },

    /// Check payments must carry a check number.
    #[error("check payments require a check number")]
    MissingCheckNumber,

    /// Card payments are only recorded against a confirmed processor charge.
    #[error("card payments require a processor charge reference")]
    MissingReference,

    /// The processor will not charge less than its minimum.
    #[error("card payments must be at least {minimum}, got {amount}")]
    BelowCardMinimum {
        /// Offered amount.
        amount: Decimal,
        /// Processor minimum.
        minimum: Decimal,
    },

    /// Payments need an authorized price.
    #[error("job is {0}; payments require an authorized price")]
    NotAuthorized(JobStatus),

    /// Only a fully check-paid, unsettled job takes a check photo.
    #[error("job is not awaiting a check photo")]
    NotAwaitingCheckPhoto,

    /// The photo reference is blank.
    #[error("check photo reference is empty")]
    EmptyCheckPhoto,
}

/// What a recorded payment did to the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// A balance remains.
    PartiallyPaid {
        /// Sum of all recorded payments.
        total_paid: Decimal,
        /// Balance still owed.
        remaining: Decimal,
    },

    /// Fully paid by cash or card; the job is closed.
    Closed,

    /// Fully paid by check; the job closes once the check is photographed.
    AwaitingCheckPhoto,

    /// A payment with the same processor reference was already recorded.
    AlreadyRecorded,
}

impl PaymentOutcome {
    /// Whether this payment closed the job.
    #[must_use]
    pub const fn closed_job(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Reject card amounts below the processor minimum before attempting a charge.
///
/// # Errors
///
/// Returns [`LedgerError::BelowCardMinimum`] when `amount < minimum`.
pub fn check_card_minimum(amount: Decimal, minimum: Decimal) -> Result<(), LedgerError> {
    if amount < minimum {
        return Err(LedgerError::BelowCardMinimum { amount, minimum });
    }

    Ok(())
}

impl Job {
    /// Sum of all recorded payments.
    #[must_use]
    pub fn total_paid(&self) -> Decimal {
        self.partial_payments
            .iter()
            .map(|payment| payment.amount)
            .sum()
    }

    /// What is still owed: `max(0, price - total_paid)`; zero for unpriced jobs.
    #[must_use]
    pub fn remaining_balance(&self) -> Decimal {
        let Some(price) = self.price else {
            return Decimal::ZERO;
        };

        (price - self.total_paid()).max(Decimal::ZERO)
    }

    /// Paid in full by check and waiting for the check to be photographed.
    #[must_use]
    pub fn is_awaiting_check_photo(&self) -> bool {
        self.status == JobStatus::Authorized
            && self.price.is_some()
            && self.payment_method == Some(PaymentMethod::Check)
            && self.remaining_balance().is_zero()
    }

    /// Payment methods that can take the current remaining balance.
    ///
    /// Card is offered only when the balance is at least the processor minimum.
    #[must_use]
    pub fn available_methods(&self, min_card_charge: Decimal) -> SmallVec<[PaymentMethod; 3]> {
        let remaining = self.remaining_balance();
        let mut methods = SmallVec::new();

        if self.status != JobStatus::Authorized || remaining <= Decimal::ZERO {
            return methods;
        }

        methods.push(PaymentMethod::Cash);
        methods.push(PaymentMethod::Check);

        if remaining >= min_card_charge {
            methods.push(PaymentMethod::Card);
        }

        methods
    }

    /// Check that `payment` could be recorded right now, without recording it.
    ///
    /// # Errors
    ///
    /// See [`Job::record_payment`].
    pub fn validate_payment(&self, payment: &NewPayment) -> Result<(), LedgerError> {
        if payment.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(payment.amount));
        }

        if payment.amount.normalize().scale() > 2 {
            return Err(LedgerError::SubCentAmount(payment.amount));
        }

        match payment.method {
            PaymentMethod::Check if payment.check_number.is_none() => {
                return Err(LedgerError::MissingCheckNumber);
            }
            PaymentMethod::Card if payment.reference.is_none() => {
                return Err(LedgerError::MissingReference);
            }
            PaymentMethod::Cash | PaymentMethod::Check | PaymentMethod::Card => {}
        }

        if self.price.is_none() || !matches!(self.status, JobStatus::Authorized | JobStatus::Closed)
        {
            return Err(LedgerError::NotAuthorized(self.status));
        }

        let remaining = self.remaining_balance();

        if payment.amount > remaining {
            return Err(LedgerError::ExceedsBalance {
                amount: payment.amount,
                remaining,
            });
        }

        Ok(())
    }

    /// Whether a payment carrying `reference` has already been recorded.
    #[must_use]
    pub fn has_payment_reference(&self, reference: &str) -> bool {
        self.partial_payments
            .iter()
            .any(|payment| payment.reference.as_deref() == Some(reference))
    }

    /// Whether a payment submitted under the client `key` has already been recorded.
    #[must_use]
    pub fn has_idempotency_key(&self, key: &str) -> bool {
        self.partial_payments
            .iter()
            .any(|payment| payment.idempotency_key.as_deref() == Some(key))
    }

    /// Append a payment and update the derived payment fields and status.
    ///
    /// Reaching the price by cash or card closes the job. Reaching it by check leaves the
    /// job `Authorized` until [`Job::attach_check_photo`] is called.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NonPositiveAmount`] / [`LedgerError::SubCentAmount`]: bad amount.
    /// - [`LedgerError::MissingCheckNumber`]: check payment without a check number.
    /// - [`LedgerError::MissingReference`]: card payment without a processor reference.
    /// - [`LedgerError::NotAuthorized`]: the job has no authorized price.
    /// - [`LedgerError::ExceedsBalance`]: the amount is more than is owed.
    pub fn record_payment(
        &mut self,
        payment: NewPayment,
        now: Timestamp,
    ) -> Result<PaymentOutcome, LedgerError> {
        if let Some(reference) = payment.reference.as_deref()
            && self.has_payment_reference(reference)
        {
            return Ok(PaymentOutcome::AlreadyRecorded);
        }

        if let Some(key) = payment.idempotency_key.as_deref()
            && self.has_idempotency_key(key)
        {
            return Ok(PaymentOutcome::AlreadyRecorded);
        }

        self.validate_payment(&payment)?;

        let Some(price) = self.price else {
            return Err(LedgerError::NotAuthorized(self.status));
        };

        let method = payment.method;

        if let Some(check_number) = &payment.check_number
            && method == PaymentMethod::Check
        {
            self.check_number = Some(check_number.clone());
        }

        self.partial_payments.push(PartialPayment {
            method,
            amount: payment.amount,
            check_number: payment.check_number.filter(|_| method == PaymentMethod::Check),
            reference: payment.reference,
            idempotency_key: payment.idempotency_key,
            recorded_at: now,
        });

        let total_paid = self.total_paid();

        self.payment_method = Some(method);
        self.updated_at = now;

        if total_paid < price {
            self.payment_amount = Some(total_paid);

            return Ok(PaymentOutcome::PartiallyPaid {
                total_paid,
                remaining: price - total_paid,
            });
        }

        self.payment_amount = Some(price);

        if method == PaymentMethod::Check {
            return Ok(PaymentOutcome::AwaitingCheckPhoto);
        }

        self.status = JobStatus::Closed;
        self.closed_at = Some(now);

        Ok(PaymentOutcome::Closed)
    }

    /// Settle a check-paid job by attaching the photo of the check.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyCheckPhoto`]: blank photo reference.
    /// - [`LedgerError::NotAwaitingCheckPhoto`]: the job is not fully paid by check.
    pub fn attach_check_photo(
        &mut self,
        photo: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let photo = photo.into();

        if photo.trim().is_empty() {
            return Err(LedgerError::EmptyCheckPhoto);
        }

        if !self.is_awaiting_check_photo() {
            return Err(LedgerError::NotAwaitingCheckPhoto);
        }

        self.check_photo = Some(photo);
        self.status = JobStatus::Closed;
        self.updated_at = now;
        self.closed_at = Some(now);

        Ok(())
    }
}
