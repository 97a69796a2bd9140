//! Jobs Repository

use fieldwork::jobs::{Job, JobStatus, JobUuid};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Transaction, query, query_as, types::Json};

use crate::domain::jobs::{
    data::{InvoiceDraft, JobFilter, NewJob},
    records::{InvoiceDraftRecord, JobRecord},
};

const LIST_JOBS_SQL: &str = include_str!("sql/list_jobs.sql");
const GET_JOB_SQL: &str = include_str!("sql/get_job.sql");
const CREATE_JOB_SQL: &str = include_str!("sql/create_job.sql");
const UPDATE_JOB_SQL: &str = include_str!("sql/update_job.sql");
const DELETE_JOB_SQL: &str = include_str!("sql/delete_job.sql");
const LIST_REVENUE_JOBS_SQL: &str = include_str!("sql/list_revenue_jobs.sql");
const UPSERT_INVOICE_DRAFT_SQL: &str = include_str!("sql/upsert_invoice_draft.sql");
const GET_INVOICE_DRAFT_SQL: &str = include_str!("sql/get_invoice_draft.sql");
const DELETE_INVOICE_DRAFT_SQL: &str = include_str!("sql/delete_invoice_draft.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgJobsRepository;

impl PgJobsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_jobs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &JobFilter,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let records = query_as::<Postgres, JobRecord>(LIST_JOBS_SQL)
            .bind(filter.scheduled_from.map(SqlxTimestamp::from))
            .bind(filter.scheduled_to.map(SqlxTimestamp::from))
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.tech.map(|tech| tech.into_uuid()))
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn get_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
    ) -> Result<Job, sqlx::Error> {
        query_as::<Postgres, JobRecord>(GET_JOB_SQL)
            .bind(job.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn create_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: &NewJob,
        now: Timestamp,
    ) -> Result<Job, sqlx::Error> {
        query_as::<Postgres, JobRecord>(CREATE_JOB_SQL)
            .bind(job.uuid.into_uuid())
            .bind(JobStatus::Booked.as_str())
            .bind(&job.customer.name)
            .bind(&job.customer.phone)
            .bind(job.customer.email.as_deref())
            .bind(job.customer.address.as_deref())
            .bind(&job.description)
            .bind(job.scheduled_for.map(SqlxTimestamp::from))
            .bind(job.tech_uuid.map(|tech| tech.into_uuid()))
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    /// Write every mutable column of `job` if the stored version is still `expected_version`.
    ///
    /// Returns `None` when another writer got there first.
    #[tracing::instrument(
        name = "jobs.repository.update_job",
        skip(self, tx, job),
        fields(job_uuid = %job.uuid),
        err
    )]
    pub(crate) async fn update_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: &Job,
        expected_version: i64,
    ) -> Result<Option<Job>, sqlx::Error> {
        query_as::<Postgres, JobRecord>(UPDATE_JOB_SQL)
            .bind(job.uuid.into_uuid())
            .bind(expected_version)
            .bind(job.status.as_str())
            .bind(&job.description)
            .bind(job.scheduled_for.map(SqlxTimestamp::from))
            .bind(job.tech_uuid.map(|tech| tech.into_uuid()))
            .bind(Json(&job.line_items))
            .bind(job.price)
            .bind(job.taxable)
            .bind(job.tax_amount)
            .bind(job.payment_method.map(|method| method.as_str()))
            .bind(job.payment_amount)
            .bind(Json(&job.partial_payments))
            .bind(job.check_number.as_ref().map(|number| number.as_str()))
            .bind(job.check_photo.as_deref())
            .bind(SqlxTimestamp::from(job.updated_at))
            .bind(job.closed_at.map(SqlxTimestamp::from))
            .fetch_optional(&mut **tx)
            .await
            .map(|record| record.map(|record| record.0))
    }

    pub(crate) async fn delete_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_JOB_SQL)
            .bind(job.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Jobs that can contribute to revenue since `from`: every open invoice plus jobs closed
    /// on or after `from`.
    pub(crate) async fn list_revenue_jobs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        from: Timestamp,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let records = query_as::<Postgres, JobRecord>(LIST_REVENUE_JOBS_SQL)
            .bind(SqlxTimestamp::from(from))
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn upsert_invoice_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
        draft: &InvoiceDraft,
    ) -> Result<InvoiceDraft, sqlx::Error> {
        query_as::<Postgres, InvoiceDraftRecord>(UPSERT_INVOICE_DRAFT_SQL)
            .bind(job.into_uuid())
            .bind(Json(&draft.line_items))
            .bind(draft.taxable)
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn get_invoice_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
    ) -> Result<InvoiceDraft, sqlx::Error> {
        query_as::<Postgres, InvoiceDraftRecord>(GET_INVOICE_DRAFT_SQL)
            .bind(job.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn delete_invoice_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_INVOICE_DRAFT_SQL)
            .bind(job.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
