//! Money

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso};
use thiserror::Error;

/// Smallest amount the card processor will charge by default ($0.50).
pub const DEFAULT_MIN_CARD_CHARGE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Errors converting decimal amounts for external systems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount has sub-cent precision and cannot be expressed in minor units.
    #[error("amount {0} has more precision than the currency allows")]
    SubMinorPrecision(Decimal),

    /// The amount does not fit the processor's integer representation.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),

    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
}

/// Round to the cent, half-up on the cent boundary.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Express an amount in the currency's smallest unit (cents), as payment processors expect.
///
/// # Errors
///
/// - [`MoneyError::SubMinorPrecision`]: the amount is not a whole number of cents.
/// - [`MoneyError::OutOfRange`]: the amount overflows an `i64` of cents.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    let cents = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MoneyError::OutOfRange(amount))?;

    if !cents.fract().is_zero() {
        return Err(MoneyError::SubMinorPrecision(amount));
    }

    i64::try_from(cents).map_err(|_overflow| MoneyError::OutOfRange(amount))
}

/// Look up an ISO currency by alphabetic code, e.g. `"USD"`.
///
/// # Errors
///
/// Returns [`MoneyError::UnknownCurrency`] for codes `rusty-money` does not know.
pub fn currency(code: &str) -> Result<&'static iso::Currency, MoneyError> {
    iso::find(code).ok_or_else(|| MoneyError::UnknownCurrency(code.to_string()))
}

/// Format an amount for people, e.g. `$1,234.50`.
#[must_use]
pub fn format_amount(amount: Decimal, currency: &'static iso::Currency) -> String {
    Money::from_decimal(round_cents(amount), currency).to_string()
}
