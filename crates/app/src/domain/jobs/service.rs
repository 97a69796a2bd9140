//! Jobs service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use fieldwork::{
    jobs::{Job, JobStatus, JobUuid, NewPayment},
    receipt::{Receipt, ReceiptError},
    revenue::{RevenueSummary, TimeRange},
};
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        customers::{CustomerDirectory, data::NewCustomer},
        jobs::{
            data::{
                Authorization, InvoiceDraft, JobFilter, JobUpdate, NewJob, PaymentRecorded,
            },
            errors::JobsServiceError,
            repository::PgJobsRepository,
        },
    },
    notifications::{Notification, Notifier},
    settings::BillingSettings,
};

#[derive(Clone)]
pub struct PgJobsService {
    db: Db,
    repository: PgJobsRepository,
    settings: BillingSettings,
    customers: Arc<dyn CustomerDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl PgJobsService {
    #[must_use]
    pub fn new(
        db: Db,
        settings: BillingSettings,
        customers: Arc<dyn CustomerDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            repository: PgJobsRepository::new(),
            settings,
            customers,
            notifier,
        }
    }

    /// Read-modify-write a job under its version column.
    ///
    /// `apply` runs against a fresh read on every attempt. Nothing is written when it leaves
    /// the job unchanged; a lost version race re-reads and re-applies, up to the configured
    /// number of attempts.
    async fn modify<T, F>(&self, job: JobUuid, mut apply: F) -> Result<(Job, T), JobsServiceError>
    where
        F: FnMut(&mut Job, Timestamp) -> Result<T, JobsServiceError> + Send,
        T: Send,
    {
        let attempts = self.settings.record_attempts.max(1);

        for attempt in 1..=attempts {
            let mut tx = self.db.begin().await?;

            let current = self.repository.get_job(&mut tx, job).await?;
            let mut next = current.clone();

            let value = apply(&mut next, Timestamp::now())?;

            if next == current {
                tx.commit().await?;

                return Ok((current, value));
            }

            if let Some(updated) = self
                .repository
                .update_job(&mut tx, &next, current.version)
                .await?
            {
                tx.commit().await?;

                return Ok((updated, value));
            }

            tx.rollback().await?;

            warn!(job_uuid = %job, attempt, "job.version_conflict");
        }

        Err(JobsServiceError::Conflict)
    }

    /// Closure side effects. Failures are logged and never reach the caller.
    async fn settle(&self, job: &Job) {
        if let Err(error) = self
            .customers
            .upsert_customer(NewCustomer::from(&job.customer))
            .await
        {
            warn!(job_uuid = %job.uuid, %error, "customer.upsert_failed");
        }

        let notification = match receipt_notification(job, &self.settings) {
            Ok(notification) => notification,
            Err(error) => {
                warn!(job_uuid = %job.uuid, %error, "receipt.render_failed");
                return;
            }
        };

        if !notification.has_recipient() {
            return;
        }

        if let Err(error) = self.notifier.notify(notification).await {
            warn!(job_uuid = %job.uuid, %error, "receipt.notify_failed");
        }
    }

    async fn discard_invoice_draft(&self, job: JobUuid) {
        let result = async {
            let mut tx = self.db.begin().await?;
            self.repository.delete_invoice_draft(&mut tx, job).await?;
            tx.commit().await
        }
        .await;

        if let Err(error) = result {
            warn!(job_uuid = %job, %error, "invoice_draft.discard_failed");
        }
    }
}

impl Debug for PgJobsService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PgJobsService")
            .field("db", &self.db)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn receipt_notification(
    job: &Job,
    settings: &BillingSettings,
) -> Result<Notification, ReceiptError> {
    let receipt = Receipt::for_job(job, settings.currency)?;

    Ok(Notification {
        phone: Some(job.customer.phone.clone()).filter(|phone| !phone.trim().is_empty()),
        email: job.customer.email.clone(),
        subject: receipt.subject(),
        body: receipt.to_text()?,
    })
}

#[async_trait]
impl JobsService for PgJobsService {
    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, JobsServiceError> {
        let mut tx = self.db.begin().await?;

        let jobs = self.repository.list_jobs(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(jobs)
    }

    async fn get_job(&self, job: JobUuid) -> Result<Job, JobsServiceError> {
        let mut tx = self.db.begin().await?;

        let job = self.repository.get_job(&mut tx, job).await?;

        tx.commit().await?;

        Ok(job)
    }

    async fn create_job(&self, job: NewJob) -> Result<Job, JobsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_job(&mut tx, &job, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(job_uuid = %created.uuid, "job.created");

        Ok(created)
    }

    async fn update_job(&self, job: JobUuid, update: JobUpdate) -> Result<Job, JobsServiceError> {
        let (updated, ()) = self
            .modify(job, |current, now| {
                current.description.clone_from(&update.description);
                current.scheduled_for = update.scheduled_for;
                current.tech_uuid = update.tech_uuid;
                current.updated_at = now;

                Ok(())
            })
            .await?;

        Ok(updated)
    }

    async fn set_status(&self, job: JobUuid, status: JobStatus) -> Result<Job, JobsServiceError> {
        let (updated, ()) = self
            .modify(job, |current, now| {
                current.status = current.status.dispatch_to(status)?;
                current.updated_at = now;

                Ok(())
            })
            .await?;

        info!(job_uuid = %job, status = %updated.status, "job.status_changed");

        Ok(updated)
    }

    async fn delete_job(&self, job: JobUuid) -> Result<(), JobsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_job(&mut tx, job).await?;

        if rows_affected == 0 {
            return Err(JobsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(job_uuid = %job, "job.deleted");

        Ok(())
    }

    async fn save_invoice_draft(
        &self,
        job: JobUuid,
        draft: InvoiceDraft,
    ) -> Result<InvoiceDraft, JobsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.get_job(&mut tx, job).await?;

        let saved = self
            .repository
            .upsert_invoice_draft(&mut tx, job, &draft)
            .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn get_invoice_draft(&self, job: JobUuid) -> Result<InvoiceDraft, JobsServiceError> {
        let mut tx = self.db.begin().await?;

        let draft = self.repository.get_invoice_draft(&mut tx, job).await?;

        tx.commit().await?;

        Ok(draft)
    }

    #[tracing::instrument(name = "jobs.service.authorize", skip(self, draft), err)]
    async fn authorize(
        &self,
        job: JobUuid,
        draft: InvoiceDraft,
    ) -> Result<Authorization, JobsServiceError> {
        let rate = self.settings.tax_rate;

        let (authorized, totals) = self
            .modify(job, |current, now| {
                Ok(current.authorize(draft.line_items.clone(), draft.taxable, rate, now)?)
            })
            .await?;

        self.discard_invoice_draft(job).await;

        info!(job_uuid = %job, price = %totals.price, tax = %totals.tax, "job.authorized");

        Ok(Authorization {
            job: authorized,
            totals,
        })
    }

    #[tracing::instrument(
        name = "jobs.service.record_payment",
        skip(self, payment),
        fields(method = %payment.method, amount = %payment.amount),
        err
    )]
    async fn record_payment(
        &self,
        job: JobUuid,
        payment: NewPayment,
    ) -> Result<PaymentRecorded, JobsServiceError> {
        let (recorded, outcome) = self
            .modify(job, |current, now| {
                Ok(current.record_payment(payment.clone(), now)?)
            })
            .await?;

        info!(
            job_uuid = %job,
            outcome = ?outcome,
            total_paid = %recorded.total_paid(),
            "payment.recorded"
        );

        if outcome.closed_job() {
            self.settle(&recorded).await;
        }

        Ok(PaymentRecorded {
            job: recorded,
            outcome,
        })
    }

    #[tracing::instrument(name = "jobs.service.attach_check_photo", skip(self, photo), err)]
    async fn attach_check_photo(&self, job: JobUuid, photo: String) -> Result<Job, JobsServiceError> {
        let (closed, ()) = self
            .modify(job, |current, now| {
                Ok(current.attach_check_photo(photo.as_str(), now)?)
            })
            .await?;

        info!(job_uuid = %job, "job.check_photo_attached");

        self.settle(&closed).await;

        Ok(closed)
    }

    async fn revenue(&self, range: TimeRange) -> Result<RevenueSummary, JobsServiceError> {
        let mut tx = self.db.begin().await?;

        let jobs = self
            .repository
            .list_revenue_jobs(&mut tx, range.from())
            .await?;

        tx.commit().await?;

        Ok(RevenueSummary::from_jobs(&jobs, range))
    }
}

#[automock]
#[async_trait]
pub trait JobsService: Send + Sync {
    /// Jobs matching the filter, soonest appointment first.
    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, JobsServiceError>;

    /// Retrieve a single job.
    async fn get_job(&self, job: JobUuid) -> Result<Job, JobsServiceError>;

    /// Book a new job.
    async fn create_job(&self, job: NewJob) -> Result<Job, JobsServiceError>;

    /// Replace the dispatch details of a job.
    async fn update_job(&self, job: JobUuid, update: JobUpdate) -> Result<Job, JobsServiceError>;

    /// Move a job to `en_route` or `on_site`.
    async fn set_status(&self, job: JobUuid, status: JobStatus) -> Result<Job, JobsServiceError>;

    /// Permanently remove a job.
    async fn delete_job(&self, job: JobUuid) -> Result<(), JobsServiceError>;

    /// Save the invoice being built for a job, replacing any earlier draft.
    async fn save_invoice_draft(
        &self,
        job: JobUuid,
        draft: InvoiceDraft,
    ) -> Result<InvoiceDraft, JobsServiceError>;

    /// The saved invoice draft for a job.
    async fn get_invoice_draft(&self, job: JobUuid) -> Result<InvoiceDraft, JobsServiceError>;

    /// Price the job from line items and move it to `Authorized`, discarding its draft.
    async fn authorize(
        &self,
        job: JobUuid,
        draft: InvoiceDraft,
    ) -> Result<Authorization, JobsServiceError>;

    /// Apply a payment to the job's ledger.
    async fn record_payment(
        &self,
        job: JobUuid,
        payment: NewPayment,
    ) -> Result<PaymentRecorded, JobsServiceError>;

    /// Close a check-paid job with the photo of the check.
    async fn attach_check_photo(&self, job: JobUuid, photo: String) -> Result<Job, JobsServiceError>;

    /// Money collected in `range` and what is still owed.
    async fn revenue(&self, range: TimeRange) -> Result<RevenueSummary, JobsServiceError>;
}

#[cfg(test)]
mod tests {
    use fieldwork::jobs::{
        CustomerDetails, InvoiceError, LedgerError, LineItem, PaymentMethod, PaymentOutcome,
        StatusError,
    };
    use jiff::ToSpan;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::create_job};

    use super::*;

    fn draft(amounts: &[i64]) -> InvoiceDraft {
        InvoiceDraft {
            line_items: amounts
                .iter()
                .map(|cents| LineItem::new("Labor", Decimal::new(*cents, 2)))
                .collect(),
            taxable: false,
        }
    }

    async fn authorized_job(ctx: &TestContext, cents: i64) -> TestResult<Job> {
        let job = create_job(ctx).await?;

        Ok(ctx.jobs.authorize(job.uuid, draft(&[cents])).await?.job)
    }

    #[tokio::test]
    async fn create_job_is_booked_and_unpriced() -> TestResult {
        let ctx = TestContext::new().await;

        let job = create_job(&ctx).await?;
        let fetched = ctx.jobs.get_job(job.uuid).await?;

        assert_eq!(fetched.status, JobStatus::Booked);
        assert_eq!(fetched.price, None);
        assert_eq!(fetched.version, 0);
        assert_eq!(fetched, job);

        Ok(())
    }

    #[tokio::test]
    async fn get_job_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.jobs.get_job(JobUuid::new()).await;

        assert!(
            matches!(result, Err(JobsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_jobs_filters_by_schedule_and_tech() -> TestResult {
        let ctx = TestContext::new().await;
        let tech = fieldwork::technicians::TechUuid::new();
        let now = Timestamp::now();

        let scheduled = ctx
            .jobs
            .create_job(NewJob {
                uuid: JobUuid::new(),
                customer: CustomerDetails {
                    name: "Ada".to_string(),
                    phone: "5550101".to_string(),
                    ..CustomerDetails::default()
                },
                description: "Fix sink".to_string(),
                scheduled_for: Some(now),
                tech_uuid: Some(tech),
            })
            .await?;

        create_job(&ctx).await?;

        let jobs = ctx
            .jobs
            .list_jobs(JobFilter {
                scheduled_from: Some(now.checked_sub(1.hour())?),
                scheduled_to: Some(now.checked_add(1.hour())?),
                tech: Some(tech),
                ..JobFilter::default()
            })
            .await?;

        assert_eq!(
            jobs.iter().map(|job| job.uuid).collect::<Vec<_>>(),
            vec![scheduled.uuid]
        );

        let booked = ctx
            .jobs
            .list_jobs(JobFilter {
                status: Some(JobStatus::Booked),
                ..JobFilter::default()
            })
            .await?;

        assert_eq!(booked.len(), 2, "both jobs are booked");

        Ok(())
    }

    #[tokio::test]
    async fn update_job_replaces_dispatch_details_and_bumps_version() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        let updated = ctx
            .jobs
            .update_job(
                job.uuid,
                JobUpdate {
                    description: "Replace valve".to_string(),
                    scheduled_for: None,
                    tech_uuid: None,
                },
            )
            .await?;

        assert_eq!(updated.description, "Replace valve");
        assert_eq!(updated.version, job.version + 1);

        Ok(())
    }

    #[tokio::test]
    async fn set_status_follows_transition_table() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        let en_route = ctx.jobs.set_status(job.uuid, JobStatus::EnRoute).await?;
        assert_eq!(en_route.status, JobStatus::EnRoute);

        let on_site = ctx.jobs.set_status(job.uuid, JobStatus::OnSite).await?;
        assert_eq!(on_site.status, JobStatus::OnSite);

        let regression = ctx.jobs.set_status(job.uuid, JobStatus::EnRoute).await;

        assert!(
            matches!(
                regression,
                Err(JobsServiceError::Status(StatusError::InvalidTransition { .. }))
            ),
            "expected InvalidTransition, got {regression:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_status_cannot_close_a_job() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        let result = ctx.jobs.set_status(job.uuid, JobStatus::Closed).await;

        assert!(
            matches!(
                result,
                Err(JobsServiceError::Status(StatusError::Reserved(JobStatus::Closed)))
            ),
            "expected Reserved, got {result:?}"
        );
        assert_eq!(ctx.jobs.get_job(job.uuid).await?.status, JobStatus::Booked);

        Ok(())
    }

    #[tokio::test]
    async fn invoice_draft_round_trips_and_is_discarded_on_authorize() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        let saved = ctx
            .jobs
            .save_invoice_draft(job.uuid, draft(&[1000, 1500]))
            .await?;

        assert_eq!(ctx.jobs.get_invoice_draft(job.uuid).await?, saved);

        let authorization = ctx.jobs.authorize(job.uuid, saved).await?;

        assert_eq!(authorization.totals.price, Decimal::new(2500, 2));
        assert_eq!(authorization.job.status, JobStatus::Authorized);

        let result = ctx.jobs.get_invoice_draft(job.uuid).await;

        assert!(
            matches!(result, Err(JobsServiceError::NotFound)),
            "expected draft to be discarded, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn save_invoice_draft_for_unknown_job_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .jobs
            .save_invoice_draft(JobUuid::new(), draft(&[1000]))
            .await;

        assert!(
            matches!(result, Err(JobsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn authorize_applies_configured_tax_rate() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        let authorization = ctx
            .jobs
            .authorize(
                job.uuid,
                InvoiceDraft {
                    line_items: vec![
                        LineItem::new("Labor", Decimal::new(1000, 2)),
                        LineItem::new("Valve", Decimal::new(15_125, 3)),
                    ],
                    taxable: true,
                },
            )
            .await?;

        assert_eq!(authorization.totals.tax, Decimal::new(188, 2));
        assert_eq!(authorization.job.price, Some(Decimal::new(2701, 2)));
        assert_eq!(authorization.job.tax_amount, Some(Decimal::new(188, 2)));

        Ok(())
    }

    #[tokio::test]
    async fn authorize_rejects_empty_invoice() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        let result = ctx.jobs.authorize(job.uuid, draft(&[])).await;

        assert!(
            matches!(
                result,
                Err(JobsServiceError::Invoice(InvoiceError::EmptyInvoice))
            ),
            "expected EmptyInvoice, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cash_payments_close_job_and_record_customer() -> TestResult {
        let ctx = TestContext::new().await;
        let job = authorized_job(&ctx, 10_000).await?;

        let first = ctx
            .jobs
            .record_payment(job.uuid, NewPayment::cash(Decimal::new(6000, 2)))
            .await?;

        assert_eq!(
            first.outcome,
            PaymentOutcome::PartiallyPaid {
                total_paid: Decimal::new(6000, 2),
                remaining: Decimal::new(4000, 2),
            }
        );
        assert_eq!(first.job.status, JobStatus::Authorized);
        assert_eq!(first.job.payment_amount, Some(Decimal::new(6000, 2)));

        let second = ctx
            .jobs
            .record_payment(job.uuid, NewPayment::cash(Decimal::new(4000, 2)))
            .await?;

        assert_eq!(second.outcome, PaymentOutcome::Closed);
        assert_eq!(second.job.status, JobStatus::Closed);
        assert_eq!(second.job.payment_amount, Some(Decimal::new(10_000, 2)));
        assert_eq!(second.job.partial_payments.len(), 2);

        let customer = ctx.customers.find_customer(&job.customer.phone).await?;

        assert!(customer.is_some(), "closing a job records the customer");

        let third = ctx
            .jobs
            .record_payment(job.uuid, NewPayment::cash(Decimal::new(1, 2)))
            .await;

        assert!(
            matches!(
                third,
                Err(JobsServiceError::Ledger(LedgerError::ExceedsBalance { .. }))
            ),
            "expected ExceedsBalance, got {third:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_payment_leaves_job_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let job = authorized_job(&ctx, 10_000).await?;

        let result = ctx
            .jobs
            .record_payment(job.uuid, NewPayment::check(Decimal::new(5000, 2), None))
            .await;

        assert!(
            matches!(
                result,
                Err(JobsServiceError::Ledger(LedgerError::MissingCheckNumber))
            ),
            "expected MissingCheckNumber, got {result:?}"
        );
        assert_eq!(ctx.jobs.get_job(job.uuid).await?, job);

        Ok(())
    }

    #[tokio::test]
    async fn check_payment_waits_for_photo() -> TestResult {
        let ctx = TestContext::new().await;
        let job = authorized_job(&ctx, 10_000).await?;

        let paid = ctx
            .jobs
            .record_payment(
                job.uuid,
                NewPayment::check(Decimal::new(10_000, 2), Some("1042".parse()?)),
            )
            .await?;

        assert_eq!(paid.outcome, PaymentOutcome::AwaitingCheckPhoto);
        assert_eq!(paid.job.status, JobStatus::Authorized);
        assert_eq!(paid.job.payment_method, Some(PaymentMethod::Check));
        assert_eq!(paid.job.check_number.as_ref().map(|n| n.as_str()), Some("1042"));

        let closed = ctx
            .jobs
            .attach_check_photo(job.uuid, "checks/1042.jpg".to_string())
            .await?;

        assert_eq!(closed.status, JobStatus::Closed);
        assert_eq!(closed.check_photo.as_deref(), Some("checks/1042.jpg"));

        Ok(())
    }

    #[tokio::test]
    async fn repeated_card_reference_is_recorded_once() -> TestResult {
        let ctx = TestContext::new().await;
        let job = authorized_job(&ctx, 10_000).await?;

        let payment = NewPayment::card(Decimal::new(2500, 2), "ch_123");

        let first = ctx.jobs.record_payment(job.uuid, payment.clone()).await?;
        let second = ctx.jobs.record_payment(job.uuid, payment).await?;

        assert_eq!(second.outcome, PaymentOutcome::AlreadyRecorded);
        assert_eq!(second.job, first.job, "no-op replays do not write");
        assert_eq!(second.job.partial_payments.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_payments_never_overdraw() -> TestResult {
        let ctx = TestContext::new().await;
        let job = authorized_job(&ctx, 10_000).await?;

        let (first, second) = tokio::join!(
            ctx.jobs
                .record_payment(job.uuid, NewPayment::cash(Decimal::new(6000, 2))),
            ctx.jobs
                .record_payment(job.uuid, NewPayment::cash(Decimal::new(6000, 2))),
        );

        assert!(
            first.is_ok() != second.is_ok(),
            "exactly one payment fits: {first:?} / {second:?}"
        );

        let stored = ctx.jobs.get_job(job.uuid).await?;

        assert_eq!(stored.partial_payments.len(), 1);
        assert_eq!(stored.total_paid(), Decimal::new(6000, 2));

        Ok(())
    }

    #[tokio::test]
    async fn revenue_sums_payments_in_range() -> TestResult {
        let ctx = TestContext::new().await;
        let from = Timestamp::now();

        let closed = authorized_job(&ctx, 10_000).await?;
        ctx.jobs
            .record_payment(closed.uuid, NewPayment::cash(Decimal::new(10_000, 2)))
            .await?;

        let open = authorized_job(&ctx, 5000).await?;
        ctx.jobs
            .record_payment(open.uuid, NewPayment::card(Decimal::new(2000, 2), "ch_1"))
            .await?;

        let range = TimeRange::new(from, Timestamp::now().checked_add(1.minute())?)?;
        let summary = ctx.jobs.revenue(range).await?;

        assert_eq!(summary.collected, Decimal::new(12_000, 2));
        assert_eq!(summary.collected_by(PaymentMethod::Card), Decimal::new(2000, 2));
        assert_eq!(summary.jobs_closed, 1);
        assert_eq!(summary.outstanding, Decimal::new(3000, 2));

        Ok(())
    }

    #[tokio::test]
    async fn editing_closed_job_keeps_its_closure_date() -> TestResult {
        let ctx = TestContext::new().await;
        let job = authorized_job(&ctx, 10_000).await?;

        ctx.jobs
            .record_payment(job.uuid, NewPayment::cash(Decimal::new(10_000, 2)))
            .await?;

        let closed = ctx.jobs.get_job(job.uuid).await?;
        let closed_at = closed.closed_at.ok_or("closed job has no closure time")?;

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let edited = ctx
            .jobs
            .update_job(
                job.uuid,
                JobUpdate {
                    description: "Water heater, warranty noted".to_string(),
                    scheduled_for: None,
                    tech_uuid: None,
                },
            )
            .await?;

        assert_eq!(edited.closed_at, Some(closed_at));
        assert!(edited.updated_at > closed_at);

        let closing = ctx.jobs.revenue(TimeRange::new(closed_at, edited.updated_at)?).await?;
        let editing = ctx
            .jobs
            .revenue(TimeRange::new(edited.updated_at, edited.updated_at.checked_add(1.hour())?)?)
            .await?;

        assert_eq!(closing.jobs_closed, 1);
        assert_eq!(editing.jobs_closed, 0);

        Ok(())
    }

    #[tokio::test]
    async fn delete_job_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let job = create_job(&ctx).await?;

        ctx.jobs.delete_job(job.uuid).await?;

        let result = ctx.jobs.get_job(job.uuid).await;

        assert!(
            matches!(result, Err(JobsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let again = ctx.jobs.delete_job(job.uuid).await;

        assert!(
            matches!(again, Err(JobsServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );

        Ok(())
    }
}
