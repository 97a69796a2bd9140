//! Invoice Draft Handlers
//!
//! The invoice being built on site is saved between requests so it survives the technician
//! switching devices. Drafts are not validated until the job is authorized.

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    jobs::{errors::into_status_error, models::InvoiceDraftPayload},
    state::State,
};

/// Get Invoice Draft Handler
#[endpoint(
    tags("jobs"),
    summary = "Get Invoice Draft",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Saved draft"),
        (status_code = StatusCode::NOT_FOUND, description = "No draft saved"),
    ),
)]
pub(crate) async fn get_handler(
    job: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<InvoiceDraftPayload>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let draft = state
        .app
        .jobs
        .get_invoice_draft(job.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(draft.into()))
}

/// Save Invoice Draft Handler
#[endpoint(
    tags("jobs"),
    summary = "Save Invoice Draft",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Draft saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unparseable amounts"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
    ),
)]
pub(crate) async fn put_handler(
    job: PathParam<Uuid>,
    json: JsonBody<InvoiceDraftPayload>,
    depot: &mut Depot,
) -> Result<Json<InvoiceDraftPayload>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let draft = state
        .app
        .jobs
        .save_invoice_draft(job.into_inner().into(), json.into_inner().into_draft()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(draft.into()))
}
