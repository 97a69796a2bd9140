//! Job Index Handler

use std::sync::Arc;

use fieldwork::{jobs::JobStatus, technicians::TechUuid};
use fieldwork_app::domain::jobs::data::JobFilter;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    jobs::{errors::into_status_error, get::JobResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct JobsResponse {
    /// Jobs, soonest appointment first
    pub jobs: Vec<JobResponse>,
}

/// Job Index Handler
///
/// Lists jobs, optionally filtered by appointment window `[from, to)`, status and technician.
#[endpoint(
    tags("jobs"),
    summary = "List Jobs",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    status: QueryParam<String, false>,
    tech: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<JobsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let filter = JobFilter {
        scheduled_from: from.into_timestamp("from")?,
        scheduled_to: to.into_timestamp("to")?,
        status: status
            .into_inner()
            .map(|status| status.parse::<JobStatus>())
            .transpose()
            .or_400("could not parse \"status\"")?,
        tech: tech.into_inner().map(TechUuid::from_uuid),
    };

    let jobs = state
        .app
        .jobs
        .list_jobs(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(JobsResponse {
        jobs: jobs.into_iter().map(Into::into).collect(),
    }))
}
