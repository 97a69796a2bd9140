//! Clock In Handler

use std::sync::Arc;

use fieldwork::jobs::JobUuid;
use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    timeclock::{
        errors::into_status_error,
        models::{TimeEntryResponse, acting_tech},
    },
};

/// Clock In Handler
///
/// Opens a new shift for the caller, or for `tech` when called by an admin.
#[endpoint(
    tags("timeclock"),
    summary = "Clock In",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Shift opened"),
        (status_code = StatusCode::FORBIDDEN, description = "Clocking in another technician"),
        (status_code = StatusCode::CONFLICT, description = "Already clocked in"),
    ),
)]
pub(crate) async fn handler(
    tech: QueryParam<Uuid, false>,
    job: QueryParam<Uuid, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TimeEntryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tech = acting_tech(depot.principal_or_401()?, tech.into_inner())?;

    let entry = state
        .app
        .timeclock
        .clock_in(tech, job.into_inner().map(JobUuid::from_uuid))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(entry.into()))
}

#[cfg(test)]
mod tests {
    use fieldwork::{
        technicians::TechUuid,
        timeclock::{TimeClockError, TimeEntry},
    };
    use fieldwork_app::{auth::Role, domain::time_entries::MockTimeClockService};
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, principal};

    use super::*;

    fn make_service(timeclock: MockTimeClockService, role: Role) -> Service {
        Mocks::timeclock(timeclock).service(
            role,
            Router::with_path("timeclock/clock-in").post(handler),
        )
    }

    #[tokio::test]
    async fn test_clock_in_for_caller() -> TestResult {
        let tech = principal(Role::Technician).tech_uuid();
        let job = Uuid::now_v7();

        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_clock_in()
            .once()
            .withf(move |t, j| *t == tech && *j == Some(JobUuid::from_uuid(job)))
            .return_once(|t, j| Ok(TimeEntry::clock_in(t, j, Timestamp::UNIX_EPOCH)));

        let mut res = TestClient::post(format!("http://example.com/timeclock/clock-in?job={job}"))
            .send(&make_service(timeclock, Role::Technician))
            .await;

        let body: TimeEntryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.tech_uuid, tech.into_uuid());
        assert_eq!(body.job_uuid, Some(job));
        assert!(body.open, "new shifts are open");

        Ok(())
    }

    #[tokio::test]
    async fn test_technician_cannot_clock_in_others() -> TestResult {
        let mut timeclock = MockTimeClockService::new();

        timeclock.expect_clock_in().never();

        let res = TestClient::post(format!(
            "http://example.com/timeclock/clock-in?tech={}",
            Uuid::now_v7()
        ))
        .send(&make_service(timeclock, Role::Technician))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_already_clocked_in_returns_409() -> TestResult {
        let tech = Uuid::now_v7();

        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_clock_in()
            .once()
            .withf(move |t, _| *t == TechUuid::from_uuid(tech))
            .return_once(|t, _| Err(TimeClockError::AlreadyClockedIn(t).into()));

        let res = TestClient::post(format!("http://example.com/timeclock/clock-in?tech={tech}"))
            .send(&make_service(timeclock, Role::Admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
