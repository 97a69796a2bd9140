//! App Router

use salvo::Router;

use crate::{auth, jobs, reports, timeclock};

/// Authenticated API routes.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(jobs_router())
        .push(timeclock_router())
        .push(Router::with_path("reports/revenue").get(reports::revenue::handler))
}

fn jobs_router() -> Router {
    Router::with_path("jobs")
        .get(jobs::index::handler)
        .post(jobs::create::handler)
        .push(
            Router::with_path("{job}")
                .get(jobs::get::handler)
                .put(jobs::update::handler)
                .delete(jobs::delete::handler)
                .push(Router::with_path("status").put(jobs::status::handler))
                .push(
                    Router::with_path("draft")
                        .get(jobs::draft::get_handler)
                        .put(jobs::draft::put_handler),
                )
                .push(Router::with_path("authorize").post(jobs::authorize::handler))
                .push(Router::with_path("balance").get(jobs::balance::handler))
                .push(
                    Router::with_path("payments")
                        .post(jobs::payments::handler)
                        .push(Router::with_path("card").post(jobs::card::handler)),
                )
                .push(Router::with_path("check-photo").post(jobs::check_photo::handler)),
        )
}

fn timeclock_router() -> Router {
    Router::with_path("timeclock")
        .push(Router::with_path("clock-in").post(timeclock::clock_in::handler))
        .push(Router::with_path("clock-out").post(timeclock::punch::clock_out))
        .push(Router::with_path("break-start").post(timeclock::punch::break_start))
        .push(Router::with_path("break-end").post(timeclock::punch::break_end))
        .push(
            Router::with_path("entries")
                .get(timeclock::entries::handler)
                .push(Router::with_path("{entry}").put(timeclock::edit::handler)),
        )
        .push(Router::with_path("report").get(timeclock::report::handler))
}

#[cfg(test)]
mod tests {
    use salvo::{prelude::*, test::TestClient};
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service() -> Service {
        Service::new(
            Router::new()
                .hoop(salvo::affix_state::inject(Mocks::default().into_state()))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn test_api_routes_require_a_token() -> TestResult {
        let service = make_service();

        for url in [
            "http://example.com/jobs",
            "http://example.com/timeclock/entries",
            "http://example.com/timeclock/report",
            "http://example.com/reports/revenue",
        ] {
            let res = TestClient::get(url).send(&service).await;

            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "{url}");
        }

        let res = TestClient::post("http://example.com/timeclock/clock-in")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
