//! Card payment errors.

use fieldwork::{jobs::LedgerError, money::MoneyError};
use thiserror::Error;

use crate::domain::{jobs::JobsServiceError, payments::PaymentProcessorError};

#[derive(Debug, Error)]
pub enum CardPaymentsError {
    #[error(transparent)]
    Jobs(#[from] JobsServiceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("card charge failed")]
    Processor(#[from] PaymentProcessorError),

    /// The processor took the money but the job could not be updated.
    #[error("charge {charge_id} succeeded but could not be recorded")]
    ChargedButUnrecorded {
        charge_id: String,
        #[source]
        source: JobsServiceError,
    },
}
