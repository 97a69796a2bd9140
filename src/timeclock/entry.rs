//! Time Entries

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

use crate::{jobs::JobUuid, technicians::TechUuid, timeclock::TimeClockError, uuids::TypedUuid};

/// Time entry UUID
pub type TimeEntryUuid = TypedUuid<TimeEntry>;

/// One work session for a technician, open until clocked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    /// Identifier.
    pub uuid: TimeEntryUuid,

    /// Technician who punched in.
    pub tech_uuid: TechUuid,

    /// Start of the shift.
    pub clock_in: Timestamp,

    /// End of the shift; `None` while the shift is open.
    pub clock_out: Option<Timestamp>,

    /// Start of the break, if one was taken.
    pub break_start: Option<Timestamp>,

    /// End of the break; a break is in progress while this is `None` and `break_start` is set.
    pub break_end: Option<Timestamp>,

    /// Job being worked, if any.
    pub job_uuid: Option<JobUuid>,

    /// Set when an administrator changed the entry.
    pub edited_at: Option<Timestamp>,

    /// Administrator's note for the last edit.
    pub edit_note: Option<String>,

    /// Creation time.
    pub created_at: Timestamp,
}

/// A punch applied to a technician's open entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punch {
    /// Close the shift.
    ClockOut,

    /// Start a break. A second start overwrites the first.
    BreakStart,

    /// End the break.
    BreakEnd,
}

/// Administrative correction of an entry. `None` fields are left as they are, except the
/// note which is stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PunchEdit {
    /// Replacement clock-in time.
    pub clock_in: Option<Timestamp>,

    /// Replacement clock-out time.
    pub clock_out: Option<Timestamp>,

    /// Note explaining the change.
    pub note: Option<String>,
}

impl TimeEntry {
    /// Open a new shift at `now`.
    ///
    /// Never checks for an existing open shift; callers that need one-open-shift-per-tech
    /// enforce it around this call.
    #[must_use]
    pub fn clock_in(tech_uuid: TechUuid, job_uuid: Option<JobUuid>, now: Timestamp) -> Self {
        Self {
            uuid: TimeEntryUuid::new(),
            tech_uuid,
            clock_in: now,
            clock_out: None,
            break_start: None,
            break_end: None,
            job_uuid,
            edited_at: None,
            edit_note: None,
            created_at: now,
        }
    }

    /// The shift has not been clocked out.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// A break has started and not ended.
    #[must_use]
    pub fn is_on_break(&self) -> bool {
        self.break_start.is_some() && self.break_end.is_none()
    }

    /// An administrator has edited the entry.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Record a punch on this entry at `now`.
    pub fn punch(&mut self, punch: Punch, now: Timestamp) {
        match punch {
            Punch::ClockOut => self.clock_out = Some(now),
            Punch::BreakStart => self.break_start = Some(now),
            Punch::BreakEnd => self.break_end = Some(now),
        }
    }

    /// Minutes worked, evaluated at `now` for open shifts and open breaks.
    ///
    /// A closed break is always subtracted. An open break is subtracted up to `now` only while
    /// the shift is open; on a clocked-out shift an unfinished break counts as worked time.
    /// Inverted punches produce negative results.
    #[must_use]
    pub fn worked_minutes(&self, now: Timestamp) -> Decimal {
        let end = self.clock_out.unwrap_or(now);
        let mut worked = end.duration_since(self.clock_in);

        match (self.break_start, self.break_end) {
            (Some(start), Some(finish)) => worked -= finish.duration_since(start),
            (Some(start), None) if self.is_open() => worked -= now.duration_since(start),
            _ => {}
        }

        minutes(worked)
    }

    /// Apply an administrative correction.
    ///
    /// Chronology is not validated. Returns whether any field changed; `edited_at` is only
    /// stamped when one did.
    pub fn apply_edit(&mut self, edit: PunchEdit, now: Timestamp) -> bool {
        let mut changed = false;

        if let Some(clock_in) = edit.clock_in
            && clock_in != self.clock_in
        {
            self.clock_in = clock_in;
            changed = true;
        }

        if let Some(clock_out) = edit.clock_out
            && self.clock_out != Some(clock_out)
        {
            self.clock_out = Some(clock_out);
            changed = true;
        }

        if edit.note != self.edit_note {
            self.edit_note = edit.note;
            changed = true;
        }

        if changed {
            self.edited_at = Some(now);
        }

        changed
    }
}

/// The most recently started open entry for `tech_uuid`.
pub fn find_open_entry(entries: &[TimeEntry], tech_uuid: TechUuid) -> Option<&TimeEntry> {
    entries
        .iter()
        .filter(|entry| entry.tech_uuid == tech_uuid && entry.is_open())
        .max_by_key(|entry| entry.clock_in)
}

/// Apply `punch` to the technician's most recent open entry.
///
/// # Errors
///
/// Returns [`TimeClockError::NoOpenShift`] when the technician has no open entry.
pub fn punch_open_entry(
    entries: &mut [TimeEntry],
    tech_uuid: TechUuid,
    punch: Punch,
    now: Timestamp,
) -> Result<&TimeEntry, TimeClockError> {
    let entry = entries
        .iter_mut()
        .filter(|entry| entry.tech_uuid == tech_uuid && entry.is_open())
        .max_by_key(|entry| entry.clock_in)
        .ok_or(TimeClockError::NoOpenShift(tech_uuid))?;

    entry.punch(punch, now);

    Ok(entry)
}

fn minutes(duration: SignedDuration) -> Decimal {
    Decimal::from_i128_with_scale(duration.as_nanos(), 9) / Decimal::from(60)
}
