//! Card charge and record flow.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use fieldwork::{
    jobs::{JobUuid, NewPayment, PaymentOutcome, check_card_minimum},
    money::to_minor_units,
};
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        jobs::{JobsService, data::PaymentRecorded},
        payments::{ChargeRequest, CardPaymentsError, PaymentProcessor},
    },
    settings::BillingSettings,
};

/// A card payment as submitted by a technician.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCharge {
    pub amount: Decimal,

    /// Tokenized card from the client.
    pub source: String,

    /// Client-chosen key so a resubmitted request is charged once.
    pub idempotency_key: Option<String>,
}

pub struct ProcessorCardPayments {
    jobs: Arc<dyn JobsService>,
    processor: Arc<dyn PaymentProcessor>,
    settings: BillingSettings,
}

impl Debug for ProcessorCardPayments {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProcessorCardPayments")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ProcessorCardPayments {
    #[must_use]
    pub fn new(
        jobs: Arc<dyn JobsService>,
        processor: Arc<dyn PaymentProcessor>,
        settings: BillingSettings,
    ) -> Self {
        Self {
            jobs,
            processor,
            settings,
        }
    }

    /// Record a confirmed charge, retrying failures that may clear up.
    async fn record_charge(
        &self,
        job: JobUuid,
        amount: Decimal,
        charge_id: String,
        idempotency_key: String,
    ) -> Result<PaymentRecorded, CardPaymentsError> {
        let attempts = self.settings.record_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = self
                .jobs
                .record_payment(
                    job,
                    NewPayment::card(amount, charge_id.as_str())
                        .with_idempotency_key(idempotency_key.as_str()),
                )
                .await;

            match result {
                Ok(recorded) => return Ok(recorded),
                Err(error) if error.is_retryable() && attempt < attempts => {
                    warn!(
                        job_uuid = %job,
                        charge_id = %charge_id,
                        attempt,
                        error = %error,
                        "card.record_retry"
                    );

                    tokio::time::sleep(self.settings.retry_backoff * attempt).await;

                    attempt += 1;
                }
                Err(error) => {
                    error!(
                        job_uuid = %job,
                        charge_id = %charge_id,
                        amount = %amount,
                        attempts = attempt,
                        error = %error,
                        "card.charged_but_unrecorded"
                    );

                    return Err(CardPaymentsError::ChargedButUnrecorded {
                        charge_id,
                        source: error,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl CardPaymentsService for ProcessorCardPayments {
    #[tracing::instrument(
        name = "payments.service.charge_card",
        skip(self, charge),
        fields(amount = %charge.amount),
        err
    )]
    async fn charge_card(
        &self,
        job: JobUuid,
        charge: CardCharge,
    ) -> Result<PaymentRecorded, CardPaymentsError> {
        let current = self.jobs.get_job(job).await?;

        if let Some(key) = charge.idempotency_key.as_deref()
            && current.has_idempotency_key(key)
        {
            info!(job_uuid = %job, "card.already_recorded");

            return Ok(PaymentRecorded {
                job: current,
                outcome: PaymentOutcome::AlreadyRecorded,
            });
        }

        check_card_minimum(charge.amount, self.settings.min_card_charge)?;

        let idempotency_key = charge
            .idempotency_key
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        current.validate_payment(&NewPayment::card(charge.amount, idempotency_key.as_str()))?;

        let confirmed = self
            .processor
            .charge(ChargeRequest {
                amount: to_minor_units(charge.amount)?,
                currency: self.settings.currency.iso_alpha_code.to_string(),
                source: charge.source,
                description: format!("Job {job}"),
                idempotency_key: idempotency_key.clone(),
            })
            .await?;

        info!(job_uuid = %job, charge_id = %confirmed.id, amount = %charge.amount, "card.charged");

        self.record_charge(job, charge.amount, confirmed.id, idempotency_key)
            .await
    }
}

#[automock]
#[async_trait]
pub trait CardPaymentsService: Send + Sync {
    /// Charge the card and record the payment against the job.
    ///
    /// Nothing is charged unless the job would accept the payment. Once the processor
    /// confirms, recording is retried; if it still fails the charge id is returned in
    /// [`CardPaymentsError::ChargedButUnrecorded`]. Resubmitting an idempotency key already
    /// recorded on the job returns [`PaymentOutcome::AlreadyRecorded`] without charging.
    async fn charge_card(
        &self,
        job: JobUuid,
        charge: CardCharge,
    ) -> Result<PaymentRecorded, CardPaymentsError>;
}
