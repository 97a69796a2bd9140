//! Edit Time Entry Handler

use std::sync::Arc;

use fieldwork::timeclock::{PunchEdit, TimeEntryUuid};
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
    state::State,
    timeclock::{errors::into_status_error, models::TimeEntryResponse},
};

/// Punch Edit Request
///
/// Omitted times are left unchanged; the note is stored as given.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EditTimeEntryRequest {
    pub clock_in: Option<String>,

    pub clock_out: Option<String>,

    /// Reason for the correction
    pub note: Option<String>,
}

impl EditTimeEntryRequest {
    fn into_edit(self) -> Result<PunchEdit, StatusError> {
        Ok(PunchEdit {
            clock_in: parse_timestamp(self.clock_in.as_deref(), "clock_in")?,
            clock_out: parse_timestamp(self.clock_out.as_deref(), "clock_out")?,
            note: self.note,
        })
    }
}

/// Edit Time Entry Handler
///
/// Administrative correction of a punch. Chronology is not validated.
#[endpoint(
    tags("timeclock"),
    summary = "Edit Time Entry",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Entry updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Requires the admin role"),
        (status_code = StatusCode::NOT_FOUND, description = "Time entry not found"),
    ),
)]
pub(crate) async fn handler(
    entry: PathParam<Uuid>,
    json: JsonBody<EditTimeEntryRequest>,
    depot: &mut Depot,
) -> Result<Json<TimeEntryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.admin_or_403()?;

    let edited = state
        .app
        .timeclock
        .edit_entry(
            TimeEntryUuid::from_uuid(entry.into_inner()),
            json.into_inner().into_edit()?,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(edited.into()))
}
