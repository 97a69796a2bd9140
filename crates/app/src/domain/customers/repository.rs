//! Customers Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::customers::data::{Customer, CustomerUuid, NewCustomer};

const UPSERT_CUSTOMER_SQL: &str = include_str!("sql/upsert_customer.sql");
const FIND_CUSTOMER_BY_PHONE_SQL: &str = include_str!("sql/find_customer_by_phone.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCustomersRepository;

impl PgCustomersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert or refresh the customer with `phone`, which must already be normalized.
    pub(crate) async fn upsert_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        phone: &str,
        customer: &NewCustomer,
        now: Timestamp,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(UPSERT_CUSTOMER_SQL)
            .bind(CustomerUuid::new().into_uuid())
            .bind(phone)
            .bind(&customer.name)
            .bind(customer.email.as_deref())
            .bind(customer.address.as_deref())
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_customer_by_phone(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        phone: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        query_as::<Postgres, Customer>(FIND_CUSTOMER_BY_PHONE_SQL)
            .bind(phone)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Customer {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            phone: row.try_get("phone")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
