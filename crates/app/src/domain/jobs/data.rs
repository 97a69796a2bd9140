//! Jobs Data

use fieldwork::{
    jobs::{CustomerDetails, InvoiceTotals, Job, JobStatus, JobUuid, LineItem, PaymentOutcome},
    technicians::TechUuid,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// New Job Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub uuid: JobUuid,
    pub customer: CustomerDetails,
    pub description: String,
    pub scheduled_for: Option<Timestamp>,
    pub tech_uuid: Option<TechUuid>,
}

/// Dispatch details a dispatcher may change. Replaces all three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    pub description: String,
    pub scheduled_for: Option<Timestamp>,
    pub tech_uuid: Option<TechUuid>,
}

/// Job listing filter. Schedule bounds are half-open: `[scheduled_from, scheduled_to)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub scheduled_from: Option<Timestamp>,
    pub scheduled_to: Option<Timestamp>,
    pub status: Option<JobStatus>,
    pub tech: Option<TechUuid>,
}

/// Line items saved while an invoice is being built on site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub line_items: Vec<LineItem>,
    pub taxable: bool,
}

/// Result of authorizing a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub job: Job,
    pub totals: InvoiceTotals,
}

/// Result of recording a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecorded {
    pub job: Job,
    pub outcome: PaymentOutcome,
}
