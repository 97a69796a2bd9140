//! Punch Handlers

use std::sync::Arc;

use fieldwork::timeclock::Punch;
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

async fn punch(
    punch: Punch,
    tech: Option<Uuid>,
    depot: &mut Depot,
) -> Result<Json<TimeEntryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tech = acting_tech(depot.principal_or_401()?, tech)?;

    let entry = state
        .app
        .timeclock
        .punch(tech, punch)
        .await
        .map_err(into_status_error)?;

    Ok(Json(entry.into()))
}

/// Clock Out Handler
///
/// Closes the most recently opened shift.
#[endpoint(
    tags("timeclock"),
    summary = "Clock Out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Shift closed"),
        (status_code = StatusCode::FORBIDDEN, description = "Punching for another technician"),
        (status_code = StatusCode::CONFLICT, description = "No open shift"),
    ),
)]
pub(crate) async fn clock_out(
    tech: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<TimeEntryResponse>, StatusError> {
    punch(Punch::ClockOut, tech.into_inner(), depot).await
}

/// Break Start Handler
#[endpoint(
    tags("timeclock"),
    summary = "Start Break",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Break started"),
        (status_code = StatusCode::FORBIDDEN, description = "Punching for another technician"),
        (status_code = StatusCode::CONFLICT, description = "No open shift"),
    ),
)]
pub(crate) async fn break_start(
    tech: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<TimeEntryResponse>, StatusError> {
    punch(Punch::BreakStart, tech.into_inner(), depot).await
}

/// Break End Handler
#[endpoint(
    tags("timeclock"),
    summary = "End Break",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Break ended"),
        (status_code = StatusCode::FORBIDDEN, description = "Punching for another technician"),
        (status_code = StatusCode::CONFLICT, description = "No open shift"),
    ),
)]
pub(crate) async fn break_end(
    tech: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<TimeEntryResponse>, StatusError> {
    punch(Punch::BreakEnd, tech.into_inner(), depot).await
}

#[cfg(test)]
mod tests {
    use fieldwork::{
        technicians::TechUuid,
        timeclock::{TimeClockError, TimeEntry},
    };
    use fieldwork_app::{auth::Role, domain::time_entries::MockTimeClockService};
    use jiff::{Timestamp, ToSpan};
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, principal};

    use super::*;

    fn make_service(timeclock: MockTimeClockService, role: Role) -> Service {
        Mocks::timeclock(timeclock).service(
            role,
            Router::with_path("timeclock")
                .push(Router::with_path("clock-out").post(clock_out))
                .push(Router::with_path("break-start").post(break_start))
                .push(Router::with_path("break-end").post(break_end)),
        )
    }

    #[tokio::test]
    async fn test_clock_out_closes_callers_shift() -> TestResult {
        let tech = principal(Role::Technician).tech_uuid();
        let start = Timestamp::UNIX_EPOCH;
        let end = start.checked_add(2.hours())?;

        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_punch()
            .once()
            .withf(move |t, p| *t == tech && *p == Punch::ClockOut)
            .return_once(move |t, p| {
                let mut entry = TimeEntry::clock_in(t, None, start);
                entry.punch(p, end);
                Ok(entry)
            });

        let mut res = TestClient::post("http://example.com/timeclock/clock-out")
            .send(&make_service(timeclock, Role::Technician))
            .await;

        let body: TimeEntryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.open, "shift is closed");
        assert_eq!(body.clock_out, Some(end.to_string()));
        assert_eq!(body.worked_minutes.parse::<Decimal>()?, Decimal::from(120));

        Ok(())
    }

    #[tokio::test]
    async fn test_break_punches_map_to_punch_kinds() -> TestResult {
        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_punch()
            .once()
            .withf(|_, p| *p == Punch::BreakStart)
            .return_once(|t, p| {
                let mut entry = TimeEntry::clock_in(t, None, Timestamp::UNIX_EPOCH);
                entry.punch(p, Timestamp::UNIX_EPOCH);
                Ok(entry)
            });

        timeclock
            .expect_punch()
            .once()
            .withf(|_, p| *p == Punch::BreakEnd)
            .return_once(|t, _| Ok(TimeEntry::clock_in(t, None, Timestamp::UNIX_EPOCH)));

        let service = make_service(timeclock, Role::Technician);

        let mut started = TestClient::post("http://example.com/timeclock/break-start")
            .send(&service)
            .await;

        let body: TimeEntryResponse = started.take_json().await?;

        assert!(body.on_break, "break in progress");

        let ended = TestClient::post("http://example.com/timeclock/break-end")
            .send(&service)
            .await;

        assert_eq!(ended.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_punch_without_open_shift_returns_409() -> TestResult {
        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_punch()
            .once()
            .return_once(|t, _| Err(TimeClockError::NoOpenShift(t).into()));

        let res = TestClient::post("http://example.com/timeclock/clock-out")
            .send(&make_service(timeclock, Role::Technician))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_punches_for_named_tech() -> TestResult {
        let tech = Uuid::now_v7();

        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_punch()
            .once()
            .withf(move |t, _| *t == TechUuid::from_uuid(tech))
            .return_once(|t, p| {
                let mut entry = TimeEntry::clock_in(t, None, Timestamp::UNIX_EPOCH);
                entry.punch(p, Timestamp::UNIX_EPOCH);
                Ok(entry)
            });

        let res = TestClient::post(format!("http://example.com/timeclock/clock-out?tech={tech}"))
            .send(&make_service(timeclock, Role::Admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
