//! Revenue Report Handler

use std::sync::Arc;

use fieldwork::revenue::{RevenueSummary, TimeRange};
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MethodRevenueResponse {
    /// `cash`, `check` or `card`
    pub method: String,

    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RevenueResponse {
    pub from: String,

    pub to: String,

    /// Sum of payments recorded in the range
    pub collected: String,

    pub by_method: Vec<MethodRevenueResponse>,

    /// Payments recorded in the range
    pub payments: usize,

    /// Jobs closed in the range
    pub jobs_closed: usize,

    /// Balance still owed across authorized jobs
    pub outstanding: String,
}

impl RevenueResponse {
    fn new(range: TimeRange, summary: RevenueSummary) -> Self {
        RevenueResponse {
            from: range.from().to_string(),
            to: range.to().to_string(),
            collected: summary.collected.to_string(),
            by_method: summary
                .by_method
                .into_iter()
                .map(|(method, amount)| MethodRevenueResponse {
                    method: method.to_string(),
                    amount: amount.to_string(),
                })
                .collect(),
            payments: summary.payments,
            jobs_closed: summary.jobs_closed,
            outstanding: summary.outstanding.to_string(),
        }
    }
}

/// Revenue Report Handler
///
/// Money collected in `[from, to)`, by payment method.
#[endpoint(
    tags("reports"),
    summary = "Revenue Report",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Revenue summary"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or inverted range"),
        (status_code = StatusCode::FORBIDDEN, description = "Requires the dispatcher or admin role"),
    ),
)]
pub(crate) async fn handler(
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<RevenueResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.dispatcher_or_403()?;

    let range = time_range(from, to)?;

    let summary = state.app.jobs.revenue(range).await.map_err(|source| {
        error!("revenue report failed: {source}");

        StatusError::internal_server_error()
    })?;

    Ok(Json(RevenueResponse::new(range, summary)))
}

#[cfg(test)]
mod tests {
    use fieldwork::jobs::{JobUuid, NewPayment};
    use fieldwork_app::{auth::Role, domain::jobs::MockJobsService};
    use jiff::{Timestamp, ToSpan};
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, authorized_job};

    use super::*;

    const URL: &str =
        "http://example.com/reports/revenue?from=1970-01-01T00:00:00Z&to=1970-01-02T00:00:00Z";

    fn make_service(jobs: MockJobsService, role: Role) -> Service {
        Mocks::jobs(jobs).service(role, Router::with_path("reports/revenue").get(handler))
    }

    #[tokio::test]
    async fn test_revenue_breaks_down_by_method() -> TestResult {
        let range = TimeRange::new(
            Timestamp::UNIX_EPOCH,
            Timestamp::UNIX_EPOCH.checked_add(24.hours())?,
        )?;

        let mut paid = authorized_job(JobUuid::new(), Decimal::new(10_000, 2))?;

        paid.record_payment(NewPayment::cash(Decimal::new(4_000, 2)), Timestamp::UNIX_EPOCH)?;
        paid.record_payment(
            NewPayment::card(Decimal::new(6_000, 2), "ch_1"),
            Timestamp::UNIX_EPOCH,
        )?;

        let summary = RevenueSummary::from_jobs([&paid], range);

        let mut jobs = MockJobsService::new();

        jobs.expect_revenue()
            .once()
            .withf(move |r| *r == range)
            .return_once(move |_| Ok(summary));

        let mut res = TestClient::get(URL)
            .send(&make_service(jobs, Role::Dispatcher))
            .await;

        let body: RevenueResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.collected.parse::<Decimal>()?, Decimal::from(100));
        assert_eq!(body.payments, 2);
        assert_eq!(body.jobs_closed, 1);
        assert_eq!(
            body.by_method
                .iter()
                .map(|row| row.method.as_str())
                .collect::<Vec<_>>(),
            vec!["cash", "card"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_technicians_cannot_see_revenue() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_revenue().never();

        let res = TestClient::get(URL)
            .send(&make_service(jobs, Role::Technician))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_revenue().never();

        let res = TestClient::get(
            "http://example.com/reports/revenue?from=1970-01-02T00:00:00Z&to=1970-01-01T00:00:00Z",
        )
        .send(&make_service(jobs, Role::Admin))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
