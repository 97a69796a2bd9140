//! Revenue

use std::collections::BTreeMap;

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::jobs::{Job, JobStatus, PaymentMethod};

/// Report range errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// `to` must come after `from`.
    #[error("range end {to} is not after start {from}")]
    Inverted {
        /// Start of the range.
        from: Timestamp,
        /// End of the range.
        to: Timestamp,
    },
}

/// Half-open interval `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: Timestamp,
    to: Timestamp,
}

impl TimeRange {
    /// Build a range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] unless `from < to`.
    pub fn new(from: Timestamp, to: Timestamp) -> Result<Self, RangeError> {
        if from >= to {
            return Err(RangeError::Inverted { from, to });
        }

        Ok(Self { from, to })
    }

    /// Inclusive start.
    #[must_use]
    pub const fn from(&self) -> Timestamp {
        self.from
    }

    /// Exclusive end.
    #[must_use]
    pub const fn to(&self) -> Timestamp {
        self.to
    }

    /// Whether `at` falls inside the range.
    #[must_use]
    pub fn contains(&self, at: Timestamp) -> bool {
        self.from <= at && at < self.to
    }
}

/// Money collected over a period.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevenueSummary {
    /// Sum of payments recorded in the range.
    pub collected: Decimal,

    /// Collected amounts per payment method.
    pub by_method: BTreeMap<PaymentMethod, Decimal>,

    /// Payments recorded in the range.
    pub payments: usize,

    /// Jobs that reached `Closed` in the range.
    pub jobs_closed: usize,

    /// Balance still owed on every `Authorized` job, regardless of range.
    pub outstanding: Decimal,
}

impl RevenueSummary {
    /// Summarise payments over `range`.
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>, range: TimeRange) -> Self {
        let mut summary = Self::default();

        for job in jobs {
            for payment in &job.partial_payments {
                if !range.contains(payment.recorded_at) {
                    continue;
                }

                summary.collected += payment.amount;
                summary.payments += 1;
                *summary.by_method.entry(payment.method).or_default() += payment.amount;
            }

            if job.status == JobStatus::Authorized {
                summary.outstanding += job.remaining_balance();
            }

            if job.closed_at.is_some_and(|at| range.contains(at)) {
                summary.jobs_closed += 1;
            }
        }

        summary
    }

    /// Collected amount for one method.
    #[must_use]
    pub fn collected_by(&self, method: PaymentMethod) -> Decimal {
        self.by_method.get(&method).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::jobs::{CustomerDetails, JobUuid, LineItem, NewPayment, TaxRate};

    use super::*;

    fn priced_job(price: Decimal, at: Timestamp) -> TestResult<Job> {
        let mut job = Job::booked(JobUuid::new(), CustomerDetails::default(), "Repair", at);

        job.authorize(vec![LineItem::new("Repair", price)], false, TaxRate::DEFAULT, at)?;

        Ok(job)
    }

    #[test]
    fn sums_payments_inside_range() -> TestResult {
        let start = Timestamp::UNIX_EPOCH;
        let range = TimeRange::new(start, start.checked_add(24.hours())?)?;

        let mut closed = priced_job(Decimal::from(100), start)?;
        closed.record_payment(NewPayment::cash(Decimal::from(40)), start.checked_add(1.hour())?)?;
        closed.record_payment(
            NewPayment::card(Decimal::from(60), "ch_1"),
            start.checked_add(2.hours())?,
        )?;

        let mut open = priced_job(Decimal::from(50), start)?;
        open.record_payment(NewPayment::cash(Decimal::from(20)), start.checked_add(30.hours())?)?;

        let summary = RevenueSummary::from_jobs([&closed, &open], range);

        assert_eq!(summary.collected, Decimal::from(100));
        assert_eq!(summary.payments, 2);
        assert_eq!(summary.collected_by(PaymentMethod::Cash), Decimal::from(40));
        assert_eq!(summary.collected_by(PaymentMethod::Card), Decimal::from(60));
        assert_eq!(summary.collected_by(PaymentMethod::Check), Decimal::ZERO);
        assert_eq!(summary.jobs_closed, 1);
        assert_eq!(summary.outstanding, Decimal::from(30));

        Ok(())
    }

    #[test]
    fn closure_is_dated_by_closed_at_not_later_edits() -> TestResult {
        let start = Timestamp::UNIX_EPOCH;
        let closing_day = TimeRange::new(start, start.checked_add(24.hours())?)?;
        let later_day = TimeRange::new(
            start.checked_add((30 * 24).hours())?,
            start.checked_add((31 * 24).hours())?,
        )?;

        let mut job = priced_job(Decimal::from(100), start)?;
        job.record_payment(NewPayment::cash(Decimal::from(100)), start.checked_add(1.hour())?)?;

        job.description = "Repair, warranty noted".to_string();
        job.updated_at = start.checked_add((30 * 24).hours())?.checked_add(2.hours())?;

        let closing = RevenueSummary::from_jobs([&job], closing_day);
        let later = RevenueSummary::from_jobs([&job], later_day);

        assert_eq!(job.closed_at, Some(start.checked_add(1.hour())?));
        assert_eq!(closing.jobs_closed, 1);
        assert_eq!(closing.collected, Decimal::from(100));
        assert_eq!(later.jobs_closed, 0);
        assert_eq!(later.collected, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn range_is_half_open() -> TestResult {
        let start = Timestamp::UNIX_EPOCH;
        let end = start.checked_add(1.hour())?;
        let range = TimeRange::new(start, end)?;

        assert!(range.contains(start));
        assert!(!range.contains(end));
        assert_eq!(
            TimeRange::new(end, start),
            Err(RangeError::Inverted {
                from: end,
                to: start
            })
        );

        Ok(())
    }
}
