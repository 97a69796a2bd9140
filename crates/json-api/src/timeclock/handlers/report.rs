//! Worked Time Report Handler

use std::sync::Arc;

use fieldwork::timeclock::WorkedTimeReport;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    timeclock::{
        errors::into_status_error,
        models::{visible_tech, whole_minutes},
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TechWorkedTimeResponse {
    pub tech_uuid: Uuid,

    pub entries: usize,

    /// Shifts still open, counted up to now
    pub open_entries: usize,

    /// Entries an administrator corrected
    pub edited_entries: usize,

    /// Whole minutes
    pub minutes: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WorkedTimeResponse {
    pub from: String,

    pub to: String,

    /// One row per technician, by id
    pub techs: Vec<TechWorkedTimeResponse>,

    /// Whole minutes across all technicians
    pub total_minutes: String,
}

impl WorkedTimeResponse {
    fn new(from: String, to: String, report: &WorkedTimeReport) -> Self {
        WorkedTimeResponse {
            from,
            to,
            techs: report
                .iter()
                .map(|(tech, totals)| TechWorkedTimeResponse {
                    tech_uuid: tech.into_uuid(),
                    entries: totals.entries,
                    open_entries: totals.open_entries,
                    edited_entries: totals.edited_entries,
                    minutes: whole_minutes(totals.minutes),
                })
                .collect(),
            total_minutes: whole_minutes(report.total_minutes()),
        }
    }
}

/// Worked Time Report Handler
///
/// Worked minutes per technician for shifts starting in `[from, to)`.
#[endpoint(
    tags("timeclock"),
    summary = "Worked Time Report",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Report"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or inverted range"),
        (status_code = StatusCode::FORBIDDEN, description = "Reporting on another technician"),
    ),
)]
pub(crate) async fn handler(
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    tech: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<WorkedTimeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tech = visible_tech(depot.principal_or_401()?, tech.into_inner())?;
    let range = time_range(from, to)?;

    let report = state
        .app
        .timeclock
        .worked_time(range, tech)
        .await
        .map_err(into_status_error)?;

    Ok(Json(WorkedTimeResponse::new(
        range.from().to_string(),
        range.to().to_string(),
        &report,
    )))
}
