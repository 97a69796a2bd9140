//! Job request and response payloads shared by several handlers.
//!
//! Money travels as decimal strings, e.g. `"60.00"`.

use fieldwork::jobs::{CustomerDetails, LineItem, PaymentOutcome};
use fieldwork_app::domain::jobs::data::{InvoiceDraft, PaymentRecorded};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, jobs::get::JobResponse};

/// Parse a money amount.
pub(crate) fn parse_amount(value: &str, name: &str) -> Result<Decimal, StatusError> {
    value
        .trim()
        .parse::<Decimal>()
        .or_400(&format!("could not parse \"{name}\""))
}

/// Customer contact details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerPayload {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<CustomerPayload> for CustomerDetails {
    fn from(customer: CustomerPayload) -> Self {
        CustomerDetails {
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
        }
    }
}

impl From<CustomerDetails> for CustomerPayload {
    fn from(customer: CustomerDetails) -> Self {
        CustomerPayload {
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
        }
    }
}

/// A billed line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineItemPayload {
    pub description: String,

    /// Decimal amount, e.g. `"125.00"`
    pub unit_price: String,
}

impl LineItemPayload {
    fn into_line_item(self) -> Result<LineItem, StatusError> {
        Ok(LineItem::new(
            self.description,
            parse_amount(&self.unit_price, "unit_price")?,
        ))
    }
}

impl From<LineItem> for LineItemPayload {
    fn from(item: LineItem) -> Self {
        LineItemPayload {
            description: item.description,
            unit_price: item.unit_price.to_string(),
        }
    }
}

/// Line items for a job's invoice.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct InvoiceDraftPayload {
    pub line_items: Vec<LineItemPayload>,

    /// Whether sales tax applies
    #[serde(default)]
    pub taxable: bool,
}

impl InvoiceDraftPayload {
    pub(crate) fn into_draft(self) -> Result<InvoiceDraft, StatusError> {
        Ok(InvoiceDraft {
            line_items: self
                .line_items
                .into_iter()
                .map(LineItemPayload::into_line_item)
                .collect::<Result<_, _>>()?,
            taxable: self.taxable,
        })
    }
}

impl From<InvoiceDraft> for InvoiceDraftPayload {
    fn from(draft: InvoiceDraft) -> Self {
        InvoiceDraftPayload {
            line_items: draft.line_items.into_iter().map(Into::into).collect(),
            taxable: draft.taxable,
        }
    }
}

/// Result of a recorded payment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    /// One of `partially_paid`, `closed`, `awaiting_check_photo`, `already_recorded`
    pub outcome: String,

    /// The job after the payment
    pub job: JobResponse,
}

impl From<PaymentRecorded> for PaymentResponse {
    fn from(recorded: PaymentRecorded) -> Self {
        PaymentResponse {
            outcome: outcome_name(recorded.outcome).to_string(),
            job: recorded.job.into(),
        }
    }
}

fn outcome_name(outcome: PaymentOutcome) -> &'static str {
    match outcome {
        PaymentOutcome::PartiallyPaid { .. } => "partially_paid",
        PaymentOutcome::Closed => "closed",
        PaymentOutcome::AwaitingCheckPhoto => "awaiting_check_photo",
        PaymentOutcome::AlreadyRecorded => "already_recorded",
    }
}
