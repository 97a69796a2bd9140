//! Jobs
//!
//! A job's monetary lifecycle: invoice authorization, the payment ledger and the status
//! machine that payments drive.

pub mod invoice;
pub mod job;
pub mod ledger;
pub mod payments;
pub mod status;

pub use invoice::{InvoiceError, InvoiceTotals, LineItem, TaxRate, totals};
pub use job::{CustomerDetails, Job, JobUuid};
pub use ledger::{LedgerError, PaymentOutcome, check_card_minimum};
pub use payments::{CheckNumber, NewPayment, PartialPayment, PaymentMethod, PaymentParseError};
pub use status::{JobStatus, StatusError};
