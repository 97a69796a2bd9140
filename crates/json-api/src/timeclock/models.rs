//! Time Clock Models

use std::string::ToString;

use fieldwork::{technicians::TechUuid, timeclock::TimeEntry};
use fieldwork_app::auth::Principal;
use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TimeEntryResponse {
    pub uuid: Uuid,

    pub tech_uuid: Uuid,

    /// Job being worked, if any
    pub job_uuid: Option<Uuid>,

    pub clock_in: String,

    /// Absent while the shift is open
    pub clock_out: Option<String>,

    pub break_start: Option<String>,

    pub break_end: Option<String>,

    /// Set when an administrator corrected the entry
    pub edited_at: Option<String>,

    pub edit_note: Option<String>,

    /// Worked minutes rounded to the whole minute, evaluated now for open shifts
    pub worked_minutes: String,

    pub open: bool,

    pub on_break: bool,

    pub created_at: String,
}

impl TimeEntryResponse {
    pub(crate) fn at(entry: TimeEntry, now: Timestamp) -> Self {
        TimeEntryResponse {
            worked_minutes: whole_minutes(entry.worked_minutes(now)),
            open: entry.is_open(),
            on_break: entry.is_on_break(),
            uuid: entry.uuid.into(),
            tech_uuid: entry.tech_uuid.into(),
            job_uuid: entry.job_uuid.map(Into::into),
            clock_in: entry.clock_in.to_string(),
            clock_out: entry.clock_out.as_ref().map(ToString::to_string),
            break_start: entry.break_start.as_ref().map(ToString::to_string),
            break_end: entry.break_end.as_ref().map(ToString::to_string),
            edited_at: entry.edited_at.as_ref().map(ToString::to_string),
            edit_note: entry.edit_note,
            created_at: entry.created_at.to_string(),
        }
    }
}

impl From<TimeEntry> for TimeEntryResponse {
    fn from(entry: TimeEntry) -> Self {
        Self::at(entry, Timestamp::now())
    }
}

/// Technician a punch or listing applies to.
///
/// Callers act for themselves; only admins may name another technician.
pub(crate) fn acting_tech(
    principal: &Principal,
    requested: Option<Uuid>,
) -> Result<TechUuid, StatusError> {
    let own = principal.tech_uuid();

    match requested.map(TechUuid::from_uuid) {
        None => Ok(own),
        Some(tech) if tech == own || principal.is_admin() => Ok(tech),
        Some(_) => Err(StatusError::forbidden()
            .brief("Only admins may act on another technician's time entries")),
    }
}

/// Technician filter for listings: dispatchers and admins see everyone, technicians only
/// themselves.
pub(crate) fn visible_tech(
    principal: &Principal,
    requested: Option<Uuid>,
) -> Result<Option<TechUuid>, StatusError> {
    if principal.can_dispatch() {
        return Ok(requested.map(TechUuid::from_uuid));
    }

    acting_tech(principal, requested).map(Some)
}

/// Whole minutes as a plain decimal string.
pub(crate) fn whole_minutes(minutes: Decimal) -> String {
    minutes
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}
