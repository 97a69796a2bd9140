//! Authorize Job Handler

use std::sync::Arc;

use fieldwork_app::domain::jobs::data::Authorization;
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
    jobs::{errors::into_status_error, get::JobResponse, models::InvoiceDraftPayload},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthorizationResponse {
    /// Sum of line items
    pub subtotal: String,

    /// Sales tax, rounded to the cent
    pub tax: String,

    /// Signed price
    pub price: String,

    pub job: JobResponse,
}

impl From<Authorization> for AuthorizationResponse {
    fn from(authorization: Authorization) -> Self {
        AuthorizationResponse {
            subtotal: authorization.totals.subtotal.to_string(),
            tax: authorization.totals.tax.to_string(),
            price: authorization.totals.price.to_string(),
            job: authorization.job.into(),
        }
    }
}

/// Authorize Job Handler
///
/// Prices the job from its line items and moves it to `Authorized`.
#[endpoint(
    tags("jobs"),
    summary = "Authorize Job",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Job authorized"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unparseable amounts"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invoice rejected"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    json: JsonBody<InvoiceDraftPayload>,
    depot: &mut Depot,
) -> Result<Json<AuthorizationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let authorization = state
        .app
        .jobs
        .authorize(job.into_inner().into(), json.into_inner().into_draft()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(authorization.into()))
}
