//! Customers Data

use fieldwork::{jobs::CustomerDetails, uuids::TypedUuid};
use jiff::Timestamp;

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// A customer in the directory, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub uuid: CustomerUuid,
    /// Digits only.
    pub phone: String,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Customer Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<&CustomerDetails> for NewCustomer {
    fn from(details: &CustomerDetails) -> Self {
        Self {
            name: details.name.clone(),
            phone: details.phone.clone(),
            email: details.email.clone(),
            address: details.address.clone(),
        }
    }
}

/// Reduce a phone number to its digits, so `(555) 010-2000` and `555.010.2000` match.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    (!digits.is_empty()).then_some(digits)
}
