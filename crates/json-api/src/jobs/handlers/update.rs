//! Update Job Handler

use std::sync::Arc;

use fieldwork::technicians::TechUuid;
use fieldwork_app::domain::jobs::data::JobUpdate;
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
    jobs::{errors::into_status_error, get::JobResponse},
    state::State,
};

/// Update Job Request
///
/// Replaces all dispatch details; omitted optional fields are cleared.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateJobRequest {
    pub description: String,

    /// RFC 3339 appointment time
    pub scheduled_for: Option<String>,

    pub tech_uuid: Option<Uuid>,
}

impl UpdateJobRequest {
    fn into_update(self) -> Result<JobUpdate, StatusError> {
        Ok(JobUpdate {
            description: self.description,
            scheduled_for: parse_timestamp(self.scheduled_for.as_deref(), "scheduled_for")?,
            tech_uuid: self.tech_uuid.map(TechUuid::from_uuid),
        })
    }
}

/// Update Job Handler
#[endpoint(
    tags("jobs"),
    summary = "Update Job Details",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::CONFLICT, description = "Job was modified concurrently"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    json: JsonBody<UpdateJobRequest>,
    depot: &mut Depot,
) -> Result<Json<JobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.dispatcher_or_403()?;

    let job = state
        .app
        .jobs
        .update_job(job.into_inner().into(), json.into_inner().into_update()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(job.into()))
}
