//! Card Payments

mod errors;
mod processor;
mod service;

pub use errors::CardPaymentsError;
pub use processor::*;
pub use service::*;
