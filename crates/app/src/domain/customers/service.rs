//! Customer directory.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::customers::{
        data::{Customer, NewCustomer, normalize_phone},
        errors::CustomersError,
        repository::PgCustomersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomerDirectory {
    db: Db,
    repository: PgCustomersRepository,
}

impl PgCustomerDirectory {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
        }
    }
}

#[async_trait]
impl CustomerDirectory for PgCustomerDirectory {
    async fn upsert_customer(&self, customer: NewCustomer) -> Result<Customer, CustomersError> {
        let phone = normalize_phone(&customer.phone)
            .ok_or_else(|| CustomersError::InvalidPhone(customer.phone.clone()))?;

        let mut tx = self.db.begin().await?;

        let upserted = self
            .repository
            .upsert_customer(&mut tx, &phone, &customer, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(upserted)
    }

    async fn find_customer(&self, phone: &str) -> Result<Option<Customer>, CustomersError> {
        let phone =
            normalize_phone(phone).ok_or_else(|| CustomersError::InvalidPhone(phone.to_string()))?;

        let mut tx = self.db.begin().await?;

        let customer = self
            .repository
            .find_customer_by_phone(&mut tx, &phone)
            .await?;

        tx.commit().await?;

        Ok(customer)
    }
}

#[automock]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Create the customer for this phone number, or refresh its details.
    async fn upsert_customer(&self, customer: NewCustomer) -> Result<Customer, CustomersError>;

    /// Look a customer up by phone number, in any formatting.
    async fn find_customer(&self, phone: &str) -> Result<Option<Customer>, CustomersError>;
}
