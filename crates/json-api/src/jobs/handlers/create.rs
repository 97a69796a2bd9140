//! Create Job Handler

use std::sync::Arc;

use fieldwork::{jobs::JobUuid, technicians::TechUuid};
use fieldwork_app::domain::jobs::data::NewJob;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    jobs::{errors::into_status_error, get::JobResponse, models::CustomerPayload},
    state::State,
};

/// Create Job Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateJobRequest {
    pub customer: CustomerPayload,

    pub description: String,

    /// RFC 3339 appointment time
    pub scheduled_for: Option<String>,

    /// Assigned technician
    pub tech_uuid: Option<Uuid>,
}

impl CreateJobRequest {
    fn into_new_job(self) -> Result<NewJob, StatusError> {
        Ok(NewJob {
            uuid: JobUuid::new(),
            customer: self.customer.into(),
            description: self.description,
            scheduled_for: parse_timestamp(self.scheduled_for.as_deref(), "scheduled_for")?,
            tech_uuid: self.tech_uuid.map(TechUuid::from_uuid),
        })
    }
}

/// Create Job Handler
///
/// Books a job. Requires the dispatcher or admin role.
#[endpoint(
    tags("jobs"),
    summary = "Create Job",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Job booked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateJobRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<JobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.dispatcher_or_403()?;

    let job = state
        .app
        .jobs
        .create_job(json.into_inner().into_new_job()?)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/jobs/{}", job.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(job.into()))
}
