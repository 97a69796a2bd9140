//! Time Entries Repository

use fieldwork::{
    technicians::TechUuid,
    timeclock::{TimeEntry, TimeEntryUuid},
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Transaction, query, query_as};

use crate::domain::time_entries::{data::TimeEntryFilter, records::TimeEntryRecord};

const CREATE_TIME_ENTRY_SQL: &str = include_str!("sql/create_time_entry.sql");
const LIST_OPEN_TIME_ENTRIES_SQL: &str = include_str!("sql/list_open_time_entries.sql");
const GET_TIME_ENTRY_SQL: &str = include_str!("sql/get_time_entry.sql");
const UPDATE_TIME_ENTRY_SQL: &str = include_str!("sql/update_time_entry.sql");
const LIST_TIME_ENTRIES_SQL: &str = include_str!("sql/list_time_entries.sql");
const LOCK_TECH_CLOCK_SQL: &str = include_str!("sql/lock_tech_clock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTimeEntriesRepository;

impl PgTimeEntriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_time_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &TimeEntry,
    ) -> Result<TimeEntry, sqlx::Error> {
        query_as::<Postgres, TimeEntryRecord>(CREATE_TIME_ENTRY_SQL)
            .bind(entry.uuid.into_uuid())
            .bind(entry.tech_uuid.into_uuid())
            .bind(SqlxTimestamp::from(entry.clock_in))
            .bind(entry.job_uuid.map(|job| job.into_uuid()))
            .bind(SqlxTimestamp::from(entry.created_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    /// Serialize clock-ins for one technician until the transaction ends.
    pub(crate) async fn lock_tech_clock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tech: TechUuid,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_TECH_CLOCK_SQL)
            .bind(tech.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Open entries for `tech`, newest first, locked for update.
    pub(crate) async fn list_open_time_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tech: TechUuid,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let records = query_as::<Postgres, TimeEntryRecord>(LIST_OPEN_TIME_ENTRIES_SQL)
            .bind(tech.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn get_time_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: TimeEntryUuid,
    ) -> Result<TimeEntry, sqlx::Error> {
        query_as::<Postgres, TimeEntryRecord>(GET_TIME_ENTRY_SQL)
            .bind(entry.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn update_time_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &TimeEntry,
    ) -> Result<TimeEntry, sqlx::Error> {
        query_as::<Postgres, TimeEntryRecord>(UPDATE_TIME_ENTRY_SQL)
            .bind(entry.uuid.into_uuid())
            .bind(SqlxTimestamp::from(entry.clock_in))
            .bind(entry.clock_out.map(SqlxTimestamp::from))
            .bind(entry.break_start.map(SqlxTimestamp::from))
            .bind(entry.break_end.map(SqlxTimestamp::from))
            .bind(entry.edited_at.map(SqlxTimestamp::from))
            .bind(entry.edit_note.as_deref())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn list_time_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let records = query_as::<Postgres, TimeEntryRecord>(LIST_TIME_ENTRIES_SQL)
            .bind(filter.tech.map(|tech| tech.into_uuid()))
            .bind(filter.from.map(SqlxTimestamp::from))
            .bind(filter.to.map(SqlxTimestamp::from))
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }
}
