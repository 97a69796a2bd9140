//! Job

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    jobs::{
        invoice::LineItem,
        payments::{CheckNumber, PartialPayment, PaymentMethod},
        status::JobStatus,
    },
    technicians::TechUuid,
    uuids::TypedUuid,
};

/// Job UUID
pub type JobUuid = TypedUuid<Job>;

/// Who the work is for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerDetails {
    /// Display name.
    pub name: String,

    /// Contact phone; the customer directory is keyed by it.
    pub phone: String,

    /// Receipt email, if given.
    pub email: Option<String>,

    /// Service address.
    pub address: Option<String>,
}

/// A unit of dispatched work and its monetary state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Immutable identifier.
    pub uuid: JobUuid,

    /// Lifecycle status.
    pub status: JobStatus,

    /// Customer the job is for.
    pub customer: CustomerDetails,

    /// Work requested.
    pub description: String,

    /// Appointment time, if scheduled.
    pub scheduled_for: Option<Timestamp>,

    /// Assigned technician.
    pub tech_uuid: Option<TechUuid>,

    /// Line items the current price was authorized from.
    pub line_items: Vec<LineItem>,

    /// Agreed total, set by authorization.
    pub price: Option<Decimal>,

    /// Whether tax was applied at authorization.
    pub taxable: bool,

    /// Present only when `taxable`.
    pub tax_amount: Option<Decimal>,

    /// Method of the most recent payment.
    pub payment_method: Option<PaymentMethod>,

    /// Running total while partially paid; pinned to `price` once fully paid.
    pub payment_amount: Option<Decimal>,

    /// Append-only, in the order payments were recorded.
    pub partial_payments: Vec<PartialPayment>,

    /// Check number of the most recent check payment that carried one.
    pub check_number: Option<CheckNumber>,

    /// Reference to the photographed check that settled the job.
    pub check_photo: Option<String>,

    /// Write sequence; bumped by every persisted update.
    pub version: i64,

    /// Creation time.
    pub created_at: Timestamp,

    /// Last modification time.
    pub updated_at: Timestamp,

    /// When the job reached `Closed`; later edits leave it alone.
    pub closed_at: Option<Timestamp>,
}

impl Job {
    /// A freshly booked job with no price.
    #[must_use]
    pub fn booked(
        uuid: JobUuid,
        customer: CustomerDetails,
        description: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            uuid,
            status: JobStatus::Booked,
            customer,
            description: description.into(),
            scheduled_for: None,
            tech_uuid: None,
            line_items: Vec::new(),
            price: None,
            taxable: false,
            tax_amount: None,
            payment_method: None,
            payment_amount: None,
            partial_payments: Vec::new(),
            check_number: None,
            check_photo: None,
            version: 0,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }
}
