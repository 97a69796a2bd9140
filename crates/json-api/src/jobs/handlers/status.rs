//! Job Status Handler

use std::sync::Arc;

use fieldwork::jobs::JobStatus;
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

/// Set Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetStatusRequest {
    /// `en_route` or `on_site`; `Authorized` and `Closed` have their own endpoints
    pub status: String,
}

/// Set Job Status Handler
#[endpoint(
    tags("jobs"),
    summary = "Set Job Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    json: JsonBody<SetStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<JobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let status = json
        .into_inner()
        .status
        .parse::<JobStatus>()
        .or_400("could not parse \"status\"")?;

    let job = state
        .app
        .jobs
        .set_status(job.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(job.into()))
}
