//! Time clock service.

use async_trait::async_trait;
use fieldwork::{
    jobs::JobUuid,
    revenue::TimeRange,
    technicians::TechUuid,
    timeclock::{
        Punch, PunchEdit, TimeClockError, TimeEntry, TimeEntryUuid, WorkedTimeReport,
        find_open_entry, punch_open_entry,
    },
};
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::time_entries::{
        data::TimeEntryFilter, errors::TimeClockServiceError,
        repository::PgTimeEntriesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTimeClockService {
    db: Db,
    repository: PgTimeEntriesRepository,
    enforce_single_open_shift: bool,
}

impl PgTimeClockService {
    #[must_use]
    pub fn new(db: Db, enforce_single_open_shift: bool) -> Self {
        Self {
            db,
            repository: PgTimeEntriesRepository::new(),
            enforce_single_open_shift,
        }
    }
}

#[async_trait]
impl TimeClockService for PgTimeClockService {
    #[tracing::instrument(name = "timeclock.service.clock_in", skip(self), err)]
    async fn clock_in(
        &self,
        tech: TechUuid,
        job: Option<JobUuid>,
    ) -> Result<TimeEntry, TimeClockServiceError> {
        let mut tx = self.db.begin().await?;

        if self.enforce_single_open_shift {
            self.repository.lock_tech_clock(&mut tx, tech).await?;

            let open = self
                .repository
                .list_open_time_entries(&mut tx, tech)
                .await?;

            if find_open_entry(&open, tech).is_some() {
                return Err(TimeClockError::AlreadyClockedIn(tech).into());
            }
        }

        let entry = TimeEntry::clock_in(tech, job, Timestamp::now());

        let created = self.repository.create_time_entry(&mut tx, &entry).await?;

        tx.commit().await?;

        info!(tech_uuid = %tech, entry_uuid = %created.uuid, "timeclock.clocked_in");

        Ok(created)
    }

    #[tracing::instrument(name = "timeclock.service.punch", skip(self), err)]
    async fn punch(&self, tech: TechUuid, punch: Punch) -> Result<TimeEntry, TimeClockServiceError> {
        let mut tx = self.db.begin().await?;

        let mut open = self
            .repository
            .list_open_time_entries(&mut tx, tech)
            .await?;

        let punched = punch_open_entry(&mut open, tech, punch, Timestamp::now())?;

        let updated = self.repository.update_time_entry(&mut tx, punched).await?;

        tx.commit().await?;

        info!(tech_uuid = %tech, entry_uuid = %updated.uuid, ?punch, "timeclock.punched");

        Ok(updated)
    }

    async fn list_entries(
        &self,
        filter: TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, TimeClockServiceError> {
        let mut tx = self.db.begin().await?;

        let entries = self.repository.list_time_entries(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(entries)
    }

    #[tracing::instrument(name = "timeclock.service.edit_entry", skip(self, edit), err)]
    async fn edit_entry(
        &self,
        entry: TimeEntryUuid,
        edit: PunchEdit,
    ) -> Result<TimeEntry, TimeClockServiceError> {
        let mut tx = self.db.begin().await?;

        let mut current = self.repository.get_time_entry(&mut tx, entry).await?;

        if !current.apply_edit(edit, Timestamp::now()) {
            tx.commit().await?;

            return Ok(current);
        }

        let updated = self.repository.update_time_entry(&mut tx, &current).await?;

        tx.commit().await?;

        info!(entry_uuid = %entry, "timeclock.entry_edited");

        Ok(updated)
    }

    async fn worked_time(
        &self,
        range: TimeRange,
        tech: Option<TechUuid>,
    ) -> Result<WorkedTimeReport, TimeClockServiceError> {
        let entries = self
            .list_entries(TimeEntryFilter {
                tech,
                from: Some(range.from()),
                to: Some(range.to()),
            })
            .await?;

        Ok(WorkedTimeReport::from_entries(&entries, Timestamp::now()))
    }
}

#[automock]
#[async_trait]
pub trait TimeClockService: Send + Sync {
    /// Open a new shift for the technician.
    async fn clock_in(
        &self,
        tech: TechUuid,
        job: Option<JobUuid>,
    ) -> Result<TimeEntry, TimeClockServiceError>;

    /// Clock out or start/end a break on the technician's most recent open shift.
    async fn punch(&self, tech: TechUuid, punch: Punch) -> Result<TimeEntry, TimeClockServiceError>;

    /// Entries matching the filter, oldest clock-in first.
    async fn list_entries(
        &self,
        filter: TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, TimeClockServiceError>;

    /// Administrative correction of an entry.
    async fn edit_entry(
        &self,
        entry: TimeEntryUuid,
        edit: PunchEdit,
    ) -> Result<TimeEntry, TimeClockServiceError>;

    /// Worked minutes per technician for shifts starting in `range`.
    async fn worked_time(
        &self,
        range: TimeRange,
        tech: Option<TechUuid>,
    ) -> Result<WorkedTimeReport, TimeClockServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{settings::BillingSettings, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn clock_in_then_out_closes_the_shift() -> TestResult {
        let ctx = TestContext::new().await;
        let tech = TechUuid::new();

        let opened = ctx.timeclock.clock_in(tech, None).await?;
        assert!(opened.is_open(), "new shifts are open");

        let closed = ctx.timeclock.punch(tech, Punch::ClockOut).await?;

        assert_eq!(closed.uuid, opened.uuid);
        assert!(closed.clock_out.is_some(), "clock out is stamped");

        Ok(())
    }

    #[tokio::test]
    async fn punch_without_open_shift_is_not_found() {
        let ctx = TestContext::new().await;
        let tech = TechUuid::new();

        let result = ctx.timeclock.punch(tech, Punch::BreakStart).await;

        assert!(
            matches!(
                result,
                Err(TimeClockServiceError::TimeClock(TimeClockError::NoOpenShift(t))) if t == tech
            ),
            "expected NoOpenShift, got {result:?}"
        );
    }

    #[tokio::test]
    async fn clock_in_allows_overlapping_shifts_by_default() -> TestResult {
        let ctx = TestContext::new().await;
        let tech = TechUuid::new();

        let first = ctx.timeclock.clock_in(tech, None).await?;
        let second = ctx.timeclock.clock_in(tech, None).await?;

        let closed = ctx.timeclock.punch(tech, Punch::ClockOut).await?;

        assert_ne!(first.uuid, second.uuid);
        assert_eq!(closed.uuid, second.uuid, "punches hit the newest open shift");

        Ok(())
    }

    #[tokio::test]
    async fn single_open_shift_is_enforced_when_enabled() -> TestResult {
        let ctx = TestContext::with_settings(BillingSettings {
            enforce_single_open_shift: true,
            ..BillingSettings::default()
        })
        .await;
        let timeclock = &ctx.timeclock;
        let tech = TechUuid::new();

        timeclock.clock_in(tech, None).await?;

        let result = timeclock.clock_in(tech, None).await;

        assert!(
            matches!(
                result,
                Err(TimeClockServiceError::TimeClock(TimeClockError::AlreadyClockedIn(_)))
            ),
            "expected AlreadyClockedIn, got {result:?}"
        );

        timeclock.punch(tech, Punch::ClockOut).await?;
        timeclock.clock_in(tech, None).await?;

        Ok(())
    }

    #[tokio::test]
    async fn breaks_are_recorded_on_the_open_shift() -> TestResult {
        let ctx = TestContext::new().await;
        let tech = TechUuid::new();

        ctx.timeclock.clock_in(tech, Some(JobUuid::new())).await?;

        let on_break = ctx.timeclock.punch(tech, Punch::BreakStart).await?;
        assert!(on_break.is_on_break(), "break started");

        let back = ctx.timeclock.punch(tech, Punch::BreakEnd).await?;
        assert!(!back.is_on_break(), "break ended");
        assert!(back.is_open(), "shift still open");

        Ok(())
    }

    #[tokio::test]
    async fn edit_entry_stamps_and_keeps_note() -> TestResult {
        let ctx = TestContext::new().await;
        let tech = TechUuid::new();

        let entry = ctx.timeclock.clock_in(tech, None).await?;
        let clock_out = entry.clock_in.checked_add(8.hours())?;

        let edited = ctx
            .timeclock
            .edit_entry(
                entry.uuid,
                PunchEdit {
                    clock_out: Some(clock_out),
                    note: Some("forgot to clock out".to_string()),
                    ..PunchEdit::default()
                },
            )
            .await?;

        assert!(edited.is_edited(), "edits are flagged");
        assert_eq!(edited.clock_out, Some(clock_out));
        assert_eq!(edited.edit_note.as_deref(), Some("forgot to clock out"));
        assert_eq!(edited.worked_minutes(Timestamp::now()), Decimal::from(480));

        Ok(())
    }

    #[tokio::test]
    async fn edit_entry_without_changes_is_not_flagged() -> TestResult {
        let ctx = TestContext::new().await;
        let entry = ctx.timeclock.clock_in(TechUuid::new(), None).await?;

        let unchanged = ctx
            .timeclock
            .edit_entry(
                entry.uuid,
                PunchEdit {
                    clock_in: Some(entry.clock_in),
                    ..PunchEdit::default()
                },
            )
            .await?;

        assert!(!unchanged.is_edited(), "no change, no stamp");
        assert_eq!(unchanged, entry);

        Ok(())
    }

    #[tokio::test]
    async fn edit_unknown_entry_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .timeclock
            .edit_entry(TimeEntryUuid::new(), PunchEdit::default())
            .await;

        assert!(
            matches!(result, Err(TimeClockServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn worked_time_groups_by_tech() -> TestResult {
        let ctx = TestContext::new().await;
        let ada = TechUuid::new();
        let linus = TechUuid::new();

        for tech in [ada, linus, ada] {
            let entry = ctx.timeclock.clock_in(tech, None).await?;

            ctx.timeclock
                .edit_entry(
                    entry.uuid,
                    PunchEdit {
                        clock_out: Some(entry.clock_in.checked_add(2.hours())?),
                        ..PunchEdit::default()
                    },
                )
                .await?;
        }

        let now = Timestamp::now();
        let range = TimeRange::new(now.checked_sub(1.hour())?, now.checked_add(1.hour())?)?;

        let report = ctx.timeclock.worked_time(range, None).await?;

        assert_eq!(report.tech(ada).map(|t| t.entries), Some(2));
        assert_eq!(report.tech(ada).map(|t| t.minutes), Some(Decimal::from(240)));
        assert_eq!(report.tech(linus).map(|t| t.minutes), Some(Decimal::from(120)));

        let only_linus = ctx.timeclock.worked_time(range, Some(linus)).await?;

        assert!(only_linus.tech(ada).is_none(), "tech filter applies");

        Ok(())
    }
}
