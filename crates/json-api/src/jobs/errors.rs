//! Job Errors

use fieldwork::jobs::StatusError as TransitionError;
use fieldwork_app::domain::{
    jobs::JobsServiceError,
    payments::{CardPaymentsError, PaymentProcessorError},
};
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: JobsServiceError) -> StatusError {
    match error {
        JobsServiceError::AlreadyExists => StatusError::conflict().brief("Job already exists"),
        JobsServiceError::NotFound => StatusError::not_found().brief("Job not found"),
        JobsServiceError::InvalidReference
        | JobsServiceError::MissingRequiredData
        | JobsServiceError::InvalidData => StatusError::bad_request().brief("Invalid job payload"),
        JobsServiceError::Conflict => {
            StatusError::conflict().brief("Job was modified concurrently, retry the request")
        }
        JobsServiceError::Status(TransitionError::Unknown(status)) => {
            StatusError::bad_request().brief(format!("Unknown job status {status:?}"))
        }
        JobsServiceError::Status(source) => StatusError::conflict().brief(source.to_string()),
        JobsServiceError::Invoice(source) => {
            StatusError::unprocessable_entity().brief(source.to_string())
        }
        JobsServiceError::Ledger(source) => {
            StatusError::unprocessable_entity().brief(source.to_string())
        }
        JobsServiceError::Sql(source) => {
            error!("job storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn card_status_error(error: CardPaymentsError) -> StatusError {
    match error {
        CardPaymentsError::Jobs(source) => into_status_error(source),
        CardPaymentsError::Ledger(source) => {
            StatusError::unprocessable_entity().brief(source.to_string())
        }
        CardPaymentsError::Money(source) => {
            StatusError::unprocessable_entity().brief(source.to_string())
        }
        CardPaymentsError::Processor(PaymentProcessorError::Declined(reason)) => {
            StatusError::payment_required().brief(format!("Card declined: {reason}"))
        }
        CardPaymentsError::Processor(source) => {
            error!("payment processor failure: {source}");

            StatusError::bad_gateway().brief("Payment processor unavailable")
        }
        CardPaymentsError::ChargedButUnrecorded { charge_id, .. } => {
            StatusError::internal_server_error().brief(format!(
                "Card charge {charge_id} succeeded but the payment was not recorded"
            ))
        }
    }
}
