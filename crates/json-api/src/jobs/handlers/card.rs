//! Card Payment Handler

use std::sync::Arc;

use fieldwork::jobs::{PaymentMethod, PaymentOutcome};
use fieldwork_app::domain::payments::CardCharge;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    jobs::{
        errors::card_status_error,
        models::{PaymentResponse, parse_amount},
    },
    observability,
    state::State,
};

/// Card Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CardPaymentRequest {
    /// Decimal amount, e.g. `"60.00"`
    pub amount: String,

    /// Card token from the client-side tokenizer
    pub source: String,

    /// Resubmitting with the same key never charges twice
    pub idempotency_key: Option<String>,
}

impl CardPaymentRequest {
    fn into_charge(self) -> Result<CardCharge, StatusError> {
        Ok(CardCharge {
            amount: parse_amount(&self.amount, "amount")?,
            source: self.source,
            idempotency_key: self.idempotency_key,
        })
    }
}

/// Card Payment Handler
///
/// Charges the card through the processor, then records the confirmed charge.
#[endpoint(
    tags("payments"),
    summary = "Charge Card",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Card charged and recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Card declined"),
        (status_code = StatusCode::NOT_FOUND, description = "Job not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Payment rejected before charging"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Charged but not recorded"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment processor unavailable"),
    ),
)]
pub(crate) async fn handler(
    job: PathParam<Uuid>,
    json: JsonBody<CardPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.principal_or_401()?;

    let recorded = state
        .app
        .card_payments
        .charge_card(job.into_inner().into(), json.into_inner().into_charge()?)
        .await
        .map_err(card_status_error)?;

    if recorded.outcome != PaymentOutcome::AlreadyRecorded {
        observability::observe_payment(PaymentMethod::Card, recorded.outcome.closed_job());
    }

    Ok(Json(recorded.into()))
}

#[cfg(test)]
mod tests {
    use fieldwork::jobs::{JobUuid, LedgerError, NewPayment};
    use fieldwork_app::{
        auth::Role,
        domain::{
            jobs::{JobsServiceError, data::PaymentRecorded},
            payments::{CardPaymentsError, MockCardPaymentsService, PaymentProcessorError},
        },
    };
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, authorized_job};

    use super::*;

    fn make_service(card_payments: MockCardPaymentsService) -> Service {
        Mocks {
            card_payments,
            ..Mocks::default()
        }
        .service(
            Role::Technician,
            Router::with_path("jobs/{job}/payments/card").post(handler),
        )
    }

    fn url(job: JobUuid) -> String {
        format!("http://example.com/jobs/{job}/payments/card")
    }

    #[tokio::test]
    async fn test_card_charge_closes_job() -> TestResult {
        let uuid = JobUuid::new();
        let mut job = authorized_job(uuid, Decimal::new(6_000, 2))?;

        let mut card_payments = MockCardPaymentsService::new();

        card_payments
            .expect_charge_card()
            .once()
            .withf(move |u, charge| {
                *u == uuid
                    && *charge
                        == CardCharge {
                            amount: Decimal::new(6_000, 2),
                            source: "tok_visa".to_string(),
                            idempotency_key: Some("idem-1".to_string()),
                        }
            })
            .return_once(move |_, charge| {
                let outcome = job.record_payment(
                    NewPayment::card(charge.amount, "ch_1"),
                    Timestamp::UNIX_EPOCH,
                )?;
                Ok(PaymentRecorded { job, outcome })
            });

        let mut res = TestClient::post(url(uuid))
            .json(&json!({ "amount": "60.00", "source": "tok_visa", "idempotency_key": "idem-1" }))
            .send(&make_service(card_payments))
            .await;

        let body: PaymentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "closed");
        assert_eq!(
            body.job.partial_payments.first().and_then(|p| p.reference.as_deref()),
            Some("ch_1")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_below_minimum_returns_422() -> TestResult {
        let mut card_payments = MockCardPaymentsService::new();

        card_payments.expect_charge_card().once().return_once(|_, _| {
            Err(CardPaymentsError::Ledger(LedgerError::BelowCardMinimum {
                amount: Decimal::new(25, 2),
                minimum: Decimal::new(50, 2),
            }))
        });

        let res = TestClient::post(url(JobUuid::new()))
            .json(&json!({ "amount": "0.25", "source": "tok_visa" }))
            .send(&make_service(card_payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_declined_card_returns_402() -> TestResult {
        let mut card_payments = MockCardPaymentsService::new();

        card_payments.expect_charge_card().once().return_once(|_, _| {
            Err(CardPaymentsError::Processor(PaymentProcessorError::Declined(
                "insufficient funds".to_string(),
            )))
        });

        let res = TestClient::post(url(JobUuid::new()))
            .json(&json!({ "amount": "60.00", "source": "tok_declined" }))
            .send(&make_service(card_payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::PAYMENT_REQUIRED));

        Ok(())
    }

    #[tokio::test]
    async fn test_unrecorded_charge_returns_500_with_charge_id() -> TestResult {
        let mut card_payments = MockCardPaymentsService::new();

        card_payments.expect_charge_card().once().return_once(|_, _| {
            Err(CardPaymentsError::ChargedButUnrecorded {
                charge_id: "ch_lost".to_string(),
                source: JobsServiceError::Conflict,
            })
        });

        let mut res = TestClient::post(url(JobUuid::new()))
            .json(&json!({ "amount": "60.00", "source": "tok_visa" }))
            .send(&make_service(card_payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(
            res.take_string().await?.contains("ch_lost"),
            "the charge id is reported for reconciliation"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_amount_never_charges() -> TestResult {
        let mut card_payments = MockCardPaymentsService::new();

        card_payments.expect_charge_card().never();

        let res = TestClient::post(url(JobUuid::new()))
            .json(&json!({ "amount": "sixty", "source": "tok_visa" }))
            .send(&make_service(card_payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
