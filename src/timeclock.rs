//! Time Clock
//!
//! Punch intervals per technician and the worked-time arithmetic over them.

use thiserror::Error;

use crate::technicians::TechUuid;

pub mod entry;
pub mod report;

pub use entry::{Punch, PunchEdit, TimeEntry, TimeEntryUuid, find_open_entry, punch_open_entry};
pub use report::{TechWorkedTime, WorkedTimeReport};

/// Errors raised by punch operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeClockError {
    /// Clock-out and break punches need an open shift.
    #[error("technician {0} has no open shift")]
    NoOpenShift(TechUuid),

    /// Raised only when one open shift per technician is enforced.
    #[error("technician {0} is already clocked in")]
    AlreadyClockedIn(TechUuid),
}
