//! Record Payment Handler

use std::sync::Arc;

use fieldwork::jobs::{CheckNumber, NewPayment, PaymentMethod, PaymentOutcome};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    jobs::{
        errors::into_status_error,
        models::{PaymentResponse, parse_amount},
    },
    observability,
    state::State,
};

/// Record Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecordPaymentRequest {
    /// `cash` or `check`; cards go through `/payments/card`
    pub method: String,

    /// Decimal amount, e.g. `"60.00"`
    pub amount: String,

    /// Required for checks
    pub check_number: Option<String>,
}

impl RecordPaymentRequest {
    fn into_payment(self) -> Result<NewPayment, StatusError> {
        let amount = parse_amount(&self.amount, "amount")?;

        match self.method.parse::<PaymentMethod>().or_400("invalid payment")? {
            PaymentMethod::Cash => Ok(NewPayment::cash(amount)),
            PaymentMethod::Check => Ok(NewPayment::check(
                amount,
                self.check_number
                    .as_deref()
                    .map(str::parse::<CheckNumber>)
                    .transpose()
                    .or_400("invalid payment")?,
            )),
            PaymentMethod::Card => Err(StatusError::bad_request()
                .brief("Card payments must be charged through /payments/card")),
        }
    }
}

/// Record Payment Handler
///
/// Records a cash or check payment against an authorized job.
#[endpoint(
    tags("payments"),
    summary = "Record Cash or Check Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::CONFLICT, description = "Job was modified concurrently"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Payment rejected"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    json: JsonBody<RecordPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let payment = json.into_inner().into_payment()?;
    let method = payment.method;

    let recorded = state
        .app
        .jobs
        .record_payment(job.into_inner().into(), payment)
        .await
        .map_err(into_status_error)?;

    if recorded.outcome != PaymentOutcome::AlreadyRecorded {
        observability::observe_payment(method, recorded.outcome.closed_job());
    }

    Ok(Json(recorded.into()))
}

#[cfg(test)]
mod tests {
    use fieldwork::jobs::{JobUuid, LedgerError};
    use fieldwork_app::{
        auth::Role,
        domain::jobs::{JobsServiceError, MockJobsService, data::PaymentRecorded},
    };
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, authorized_job};

    use super::*;

    fn make_service(jobs: MockJobsService) -> Service {
        Mocks::jobs(jobs).service(
            Role::Technician,
            Router::with_path("jobs/{job}/payments").post(handler),
        )
    }

    #[tokio::test]
    async fn test_cash_payment_closes_job() -> TestResult {
        let uuid = JobUuid::new();
        let mut job = authorized_job(uuid, Decimal::new(6_000, 2))?;

        let mut jobs = MockJobsService::new();

        jobs.expect_record_payment()
            .once()
            .withf(move |u, payment| {
                *u == uuid && *payment == NewPayment::cash(Decimal::new(6_000, 2))
            })
            .return_once(move |_, payment| {
                let outcome = job.record_payment(payment, Timestamp::UNIX_EPOCH)?;
                Ok(PaymentRecorded { job, outcome })
            });

        let mut res = TestClient::post(format!("http://example.com/jobs/{uuid}/payments"))
            .json(&json!({ "method": "cash", "amount": "60.00" }))
            .send(&make_service(jobs))
            .await;

        let body: PaymentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "closed");
        assert_eq!(body.job.status, "Closed");

        Ok(())
    }

    #[tokio::test]
    async fn test_check_payment_awaits_photo() -> TestResult {
        let uuid = JobUuid::new();
        let mut job = authorized_job(uuid, Decimal::new(6_000, 2))?;

        let mut jobs = MockJobsService::new();

        jobs.expect_record_payment()
            .once()
            .withf(|_, payment| {
                payment.method == PaymentMethod::Check
                    && payment.check_number.as_ref().map(CheckNumber::as_str) == Some("1042")
            })
            .return_once(move |_, payment| {
                let outcome = job.record_payment(payment, Timestamp::UNIX_EPOCH)?;
                Ok(PaymentRecorded { job, outcome })
            });

        let mut res = TestClient::post(format!("http://example.com/jobs/{uuid}/payments"))
            .json(&json!({ "method": "check", "amount": "60.00", "check_number": "1042" }))
            .send(&make_service(jobs))
            .await;

        let body: PaymentResponse = res.take_json().await?;

        assert_eq!(body.outcome, "awaiting_check_photo");
        assert_eq!(body.job.status, "Authorized");

        Ok(())
    }

    #[tokio::test]
    async fn test_card_method_is_redirected() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_record_payment().never();

        let res = TestClient::post(format!("http://example.com/jobs/{}/payments", JobUuid::new()))
            .json(&json!({ "method": "card", "amount": "60.00" }))
            .send(&make_service(jobs))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_check_number_returns_400() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_record_payment().never();

        let res = TestClient::post(format!("http://example.com/jobs/{}/payments", JobUuid::new()))
            .json(&json!({ "method": "check", "amount": "60.00", "check_number": "12a" }))
            .send(&make_service(jobs))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_overpayment_returns_422() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_record_payment().once().return_once(|_, _| {
            Err(JobsServiceError::Ledger(LedgerError::ExceedsBalance {
                amount: Decimal::new(7_000, 2),
                remaining: Decimal::new(6_000, 2),
            }))
        });

        let res = TestClient::post(format!("http://example.com/jobs/{}/payments", JobUuid::new()))
            .json(&json!({ "method": "cash", "amount": "70.00" }))
            .send(&make_service(jobs))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
