//! Time Entry Index Handler

use std::sync::Arc;

use fieldwork_app::domain::time_entries::data::TimeEntryFilter;
use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    timeclock::{
        errors::into_status_error,
        models::{TimeEntryResponse, visible_tech},
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TimeEntriesResponse {
    /// Entries, oldest clock-in first
    pub entries: Vec<TimeEntryResponse>,
}

/// Time Entry Index Handler
///
/// Lists time entries whose clock-in falls in `[from, to)`. Technicians only see their own.
#[endpoint(
    tags("timeclock"),
    summary = "List Time Entries",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    tech: QueryParam<Uuid, false>,
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<TimeEntriesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = TimeEntryFilter {
        tech: visible_tech(depot.principal_or_401()?, tech.into_inner())?,
        from: from.into_timestamp("from")?,
        to: to.into_timestamp("to")?,
    };

    let entries = state
        .app
        .timeclock
        .list_entries(filter)
        .await
        .map_err(into_status_error)?;

    let now = Timestamp::now();

    Ok(Json(TimeEntriesResponse {
        entries: entries
            .into_iter()
            .map(|entry| TimeEntryResponse::at(entry, now))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use fieldwork::{technicians::TechUuid, timeclock::TimeEntry};
    use fieldwork_app::{auth::Role, domain::time_entries::MockTimeClockService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, principal};

    use super::*;

    fn make_service(timeclock: MockTimeClockService, role: Role) -> Service {
        Mocks::timeclock(timeclock).service(
            role,
            Router::with_path("timeclock/entries").get(handler),
        )
    }

    #[tokio::test]
    async fn test_technician_listing_is_scoped_to_self() -> TestResult {
        let tech = principal(Role::Technician).tech_uuid();

        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_list_entries()
            .once()
            .withf(move |filter| {
                *filter
                    == TimeEntryFilter {
                        tech: Some(tech),
                        from: Some(Timestamp::UNIX_EPOCH),
                        to: None,
                    }
            })
            .return_once(move |_| Ok(vec![TimeEntry::clock_in(tech, None, Timestamp::UNIX_EPOCH)]));

        let mut res = TestClient::get("http://example.com/timeclock/entries?from=1970-01-01T00:00:00Z")
            .send(&make_service(timeclock, Role::Technician))
            .await;

        let body: TimeEntriesResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.entries.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_dispatcher_lists_everyone_or_one_tech() -> TestResult {
        let tech = Uuid::now_v7();

        let mut timeclock = MockTimeClockService::new();

        timeclock
            .expect_list_entries()
            .once()
            .withf(|filter| filter.tech.is_none())
            .return_once(|_| Ok(Vec::new()));

        timeclock
            .expect_list_entries()
            .once()
            .withf(move |filter| filter.tech == Some(TechUuid::from_uuid(tech)))
            .return_once(|_| Ok(Vec::new()));

        let service = make_service(timeclock, Role::Dispatcher);

        let everyone = TestClient::get("http://example.com/timeclock/entries")
            .send(&service)
            .await;

        let one = TestClient::get(format!("http://example.com/timeclock/entries?tech={tech}"))
            .send(&service)
            .await;

        assert_eq!(everyone.status_code, Some(StatusCode::OK));
        assert_eq!(one.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_technician_cannot_list_others() -> TestResult {
        let mut timeclock = MockTimeClockService::new();

        timeclock.expect_list_entries().never();

        let res = TestClient::get(format!(
            "http://example.com/timeclock/entries?tech={}",
            Uuid::now_v7()
        ))
        .send(&make_service(timeclock, Role::Technician))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
