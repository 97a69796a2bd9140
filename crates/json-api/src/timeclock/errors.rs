//! Time Clock Errors

use fieldwork_app::domain::time_entries::TimeClockServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: TimeClockServiceError) -> StatusError {
    match error {
        TimeClockServiceError::AlreadyExists => {
            StatusError::conflict().brief("Time entry already exists")
        }
        TimeClockServiceError::NotFound => StatusError::not_found().brief("Time entry not found"),
        TimeClockServiceError::MissingRequiredData | TimeClockServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid time entry payload")
        }
        TimeClockServiceError::TimeClock(source) => {
            StatusError::conflict().brief(source.to_string())
        }
        TimeClockServiceError::Sql(source) => {
            error!("time entry storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldwork::{technicians::TechUuid, timeclock::TimeClockError};
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn punch_state_errors_are_conflicts() {
        let tech = TechUuid::new();

        let no_shift = into_status_error(TimeClockError::NoOpenShift(tech).into());

        assert_eq!(no_shift.code, StatusCode::CONFLICT);
        assert_eq!(no_shift.brief, format!("technician {tech} has no open shift"));

        assert_eq!(
            into_status_error(TimeClockError::AlreadyClockedIn(tech).into()).code,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unknown_entries_are_not_found() {
        assert_eq!(
            into_status_error(TimeClockServiceError::NotFound).code,
            StatusCode::NOT_FOUND
        );
    }
}
