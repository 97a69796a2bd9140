//! Get Job Handler

use std::{string::ToString, sync::Arc};

use fieldwork::jobs::{Job, PartialPayment};
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    jobs::{
        errors::into_status_error,
        models::{CustomerPayload, LineItemPayload},
    },
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PartialPaymentResponse {
    /// `cash`, `check` or `card`
    pub method: String,

    pub amount: String,

    pub check_number: Option<String>,

    /// Processor charge id for card payments
    pub reference: Option<String>,

    pub recorded_at: String,
}

impl From<PartialPayment> for PartialPaymentResponse {
    fn from(payment: PartialPayment) -> Self {
        PartialPaymentResponse {
            method: payment.method.to_string(),
            amount: payment.amount.to_string(),
            check_number: payment.check_number.map(String::from),
            reference: payment.reference,
            recorded_at: payment.recorded_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct JobResponse {
    /// The unique identifier of the job
    pub uuid: Uuid,

    /// `booked`, `en_route`, `on_site`, `Authorized` or `Closed`
    pub status: String,

    pub customer: CustomerPayload,

    pub description: String,

    /// Appointment time
    pub scheduled_for: Option<String>,

    /// Assigned technician
    pub tech_uuid: Option<Uuid>,

    /// Line items the price was authorized from
    pub line_items: Vec<LineItemPayload>,

    /// Authorized price including tax
    pub price: Option<String>,

    pub taxable: bool,

    pub tax_amount: Option<String>,

    /// Method of the most recent payment
    pub payment_method: Option<String>,

    /// Amount of the most recent payment
    pub payment_amount: Option<String>,

    pub partial_payments: Vec<PartialPaymentResponse>,

    pub check_number: Option<String>,

    pub check_photo: Option<String>,

    /// Sum of all payments
    pub total_paid: String,

    /// Price minus payments, zero when unpriced
    pub remaining_balance: String,

    /// Write sequence number
    pub version: i64,

    pub created_at: String,

    pub updated_at: String,

    /// When the job was closed
    pub closed_at: Option<String>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        let total_paid = job.total_paid().to_string();
        let remaining_balance = job.remaining_balance().to_string();

        JobResponse {
            uuid: job.uuid.into(),
            status: job.status.to_string(),
            customer: job.customer.into(),
            description: job.description,
            scheduled_for: job.scheduled_for.as_ref().map(ToString::to_string),
            tech_uuid: job.tech_uuid.map(Into::into),
            line_items: job.line_items.into_iter().map(Into::into).collect(),
            price: job.price.as_ref().map(ToString::to_string),
            taxable: job.taxable,
            tax_amount: job.tax_amount.as_ref().map(ToString::to_string),
            payment_method: job.payment_method.as_ref().map(ToString::to_string),
            payment_amount: job.payment_amount.as_ref().map(ToString::to_string),
            partial_payments: job.partial_payments.into_iter().map(Into::into).collect(),
            check_number: job.check_number.map(String::from),
            check_photo: job.check_photo,
            total_paid,
            remaining_balance,
            version: job.version,
            created_at: job.created_at.to_string(),
            updated_at: job.updated_at.to_string(),
            closed_at: job.closed_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Get Job Handler
///
/// Returns a job with its payment ledger.
#[endpoint(
    tags("jobs"),
    summary = "Get Job",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<JobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let job = state
        .app
        .jobs
        .get_job(job.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(job.into()))
}
