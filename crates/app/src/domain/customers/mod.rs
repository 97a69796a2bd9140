//! Customers

pub mod data;
pub mod errors;
mod repository;
pub mod service;

pub use errors::CustomersError;
pub use service::*;
