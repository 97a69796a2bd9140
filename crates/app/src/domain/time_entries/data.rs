//! Time Entries Data

use fieldwork::technicians::TechUuid;
use jiff::Timestamp;

/// Time entry listing filter. Bounds apply to `clock_in` and are half-open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeEntryFilter {
    pub tech: Option<TechUuid>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
