//! Time Entries

pub mod data;
pub mod errors;
mod records;
mod repository;
pub mod service;

pub use errors::TimeClockServiceError;
pub use service::*;
