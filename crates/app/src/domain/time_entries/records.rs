//! Time Entry Records

use fieldwork::timeclock::{TimeEntry, TimeEntryUuid};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Row, postgres::PgRow};
use uuid::Uuid;

/// A `time_entries` row.
#[derive(Debug, Clone)]
pub(crate) struct TimeEntryRecord(pub(crate) TimeEntry);

impl<'r> FromRow<'r, PgRow> for TimeEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let optional = |column: &str| -> sqlx::Result<_> {
            Ok(row
                .try_get::<Option<SqlxTimestamp>, _>(column)?
                .map(SqlxTimestamp::to_jiff))
        };

        Ok(Self(TimeEntry {
            uuid: TimeEntryUuid::from_uuid(row.try_get("uuid")?),
            tech_uuid: row.try_get::<Uuid, _>("tech_uuid")?.into(),
            clock_in: row.try_get::<SqlxTimestamp, _>("clock_in")?.to_jiff(),
            clock_out: optional("clock_out")?,
            break_start: optional("break_start")?,
            break_end: optional("break_end")?,
            job_uuid: row.try_get::<Option<Uuid>, _>("job_uuid")?.map(Into::into),
            edited_at: optional("edited_at")?,
            edit_note: row.try_get("edit_note")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        }))
    }
}
