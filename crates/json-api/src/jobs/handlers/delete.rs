//! Delete Job Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, jobs::errors::into_status_error, state::State};

/// Delete Job Handler
///
/// Permanently removes a job. Requires the admin role.
#[endpoint(
    tags("jobs"),
    summary = "Delete Job",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Job deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Forbidden"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.admin_or_403()?;

    state
        .app
        .jobs
        .delete_job(job.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
