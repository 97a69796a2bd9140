//! Job Records

use fieldwork::jobs::{
    CheckNumber, CustomerDetails, Job, JobStatus, JobUuid, LineItem, PartialPayment, PaymentMethod,
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Row, postgres::PgRow, types::Json};
use uuid::Uuid;

use crate::{database::decode_error, domain::jobs::data::InvoiceDraft};

/// A `jobs` row.
#[derive(Debug, Clone)]
pub(crate) struct JobRecord(pub(crate) Job);

/// An `invoice_drafts` row.
#[derive(Debug, Clone)]
pub(crate) struct InvoiceDraftRecord(pub(crate) InvoiceDraft);

impl<'r> FromRow<'r, PgRow> for JobRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<JobStatus>()
            .map_err(|e| decode_error("status", e))?;

        let payment_method = row
            .try_get::<Option<String>, _>("payment_method")?
            .map(|method| method.parse::<PaymentMethod>())
            .transpose()
            .map_err(|e| decode_error("payment_method", e))?;

        let check_number = row
            .try_get::<Option<String>, _>("check_number")?
            .map(|number| number.parse::<CheckNumber>())
            .transpose()
            .map_err(|e| decode_error("check_number", e))?;

        Ok(Self(Job {
            uuid: JobUuid::from_uuid(row.try_get("uuid")?),
            status,
            customer: CustomerDetails {
                name: row.try_get("customer_name")?,
                phone: row.try_get("customer_phone")?,
                email: row.try_get("customer_email")?,
                address: row.try_get("customer_address")?,
            },
            description: row.try_get("description")?,
            scheduled_for: row
                .try_get::<Option<SqlxTimestamp>, _>("scheduled_for")?
                .map(SqlxTimestamp::to_jiff),
            tech_uuid: row
                .try_get::<Option<Uuid>, _>("tech_uuid")?
                .map(Into::into),
            line_items: row.try_get::<Json<Vec<LineItem>>, _>("line_items")?.0,
            price: row.try_get("price")?,
            taxable: row.try_get("taxable")?,
            tax_amount: row.try_get("tax_amount")?,
            payment_method,
            payment_amount: row.try_get("payment_amount")?,
            partial_payments: row
                .try_get::<Json<Vec<PartialPayment>>, _>("partial_payments")?
                .0,
            check_number,
            check_photo: row.try_get("check_photo")?,
            version: row.try_get("version")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            closed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("closed_at")?
                .map(SqlxTimestamp::to_jiff),
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for InvoiceDraftRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(InvoiceDraft {
            line_items: row.try_get::<Json<Vec<LineItem>>, _>("line_items")?.0,
            taxable: row.try_get("taxable")?,
        }))
    }
}
