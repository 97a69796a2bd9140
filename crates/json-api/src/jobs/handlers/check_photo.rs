//! Check Photo Handler

use std::sync::Arc;

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
    observability,
    state::State,
};

/// Check Photo Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckPhotoRequest {
    /// Reference to the stored photo of the check
    pub photo: String,
}

/// Check Photo Handler
///
/// Attaches the check photo to a fully check-paid job and closes it.
#[endpoint(
    tags("payments"),
    summary = "Attach Check Photo",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job closed"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Job is not awaiting a check photo"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    json: JsonBody<CheckPhotoRequest>,
    depot: &mut Depot,
) -> Result<Json<JobResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let closed = state
        .app
        .jobs
        .attach_check_photo(job.into_inner().into(), json.into_inner().photo)
        .await
        .map_err(into_status_error)?;

    observability::observe_job_closed();

    Ok(Json(closed.into()))
}
