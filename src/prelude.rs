//! Fieldwork prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    jobs::{
        CheckNumber, CustomerDetails, InvoiceError, InvoiceTotals, Job, JobStatus, JobUuid,
        LedgerError, LineItem, NewPayment, PartialPayment, PaymentMethod, PaymentOutcome,
        PaymentParseError, StatusError, TaxRate, check_card_minimum, totals,
    },
    money::{
        DEFAULT_MIN_CARD_CHARGE, MoneyError, currency, format_amount, round_cents, to_minor_units,
    },
    receipt::{Receipt, ReceiptError},
    revenue::{RangeError, RevenueSummary, TimeRange},
    technicians::{TechUuid, Technician},
    timeclock::{
        Punch, PunchEdit, TechWorkedTime, TimeClockError, TimeEntry, TimeEntryUuid,
        WorkedTimeReport, find_open_entry, punch_open_entry,
    },
    uuids::TypedUuid,
};
