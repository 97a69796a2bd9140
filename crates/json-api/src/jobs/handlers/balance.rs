//! Job Balance Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, jobs::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BalanceResponse {
    pub total_paid: String,

    pub remaining_balance: String,

    /// Methods that can pay the remaining balance now
    pub available_methods: Vec<String>,

    /// Smallest card charge accepted
    pub min_card_charge: String,
}

/// Job Balance Handler
///
/// What is still owed and how it can be paid.
#[endpoint(
    tags("jobs"),
    summary = "Get Job Balance",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Balance"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BalanceResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let min_card_charge = state.app.settings.min_card_charge;

    let job = state
        .app
        .jobs
        .get_job(job.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(BalanceResponse {
        total_paid: job.total_paid().to_string(),
        remaining_balance: job.remaining_balance().to_string(),
        available_methods: job
            .available_methods(min_card_charge)
            .iter()
            .map(ToString::to_string)
            .collect(),
        min_card_charge: min_card_charge.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use fieldwork::jobs::{JobUuid, NewPayment};
    use fieldwork_app::{auth::Role, domain::jobs::MockJobsService};
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, authorized_job};

    use super::*;

    fn make_service(jobs: MockJobsService) -> Service {
        Mocks::jobs(jobs).service(
            Role::Technician,
            Router::with_path("jobs/{job}/balance").get(handler),
        )
    }

    #[tokio::test]
    async fn test_balance_offers_card_above_minimum() -> TestResult {
        let uuid = JobUuid::new();
        let job = authorized_job(uuid, Decimal::new(6_000, 2))?;

        let mut jobs = MockJobsService::new();

        jobs.expect_get_job().once().return_once(move |_| Ok(job));

        let mut res = TestClient::get(format!("http://example.com/jobs/{uuid}/balance"))
            .send(&make_service(jobs))
            .await;

        let body: BalanceResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.remaining_balance, "60.00");
        assert_eq!(body.available_methods, vec!["cash", "check", "card"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_hides_card_below_minimum() -> TestResult {
        let uuid = JobUuid::new();
        let mut job = authorized_job(uuid, Decimal::new(6_000, 2))?;

        job.record_payment(NewPayment::cash(Decimal::new(5_975, 2)), Timestamp::UNIX_EPOCH)?;

        let mut jobs = MockJobsService::new();

        jobs.expect_get_job().once().return_once(move |_| Ok(job));

        let mut res = TestClient::get(format!("http://example.com/jobs/{uuid}/balance"))
            .send(&make_service(jobs))
            .await;

        let body: BalanceResponse = res.take_json().await?;

        assert_eq!(body.remaining_balance, "0.25");
        assert_eq!(body.available_methods, vec!["cash", "check"]);

        Ok(())
    }
}
