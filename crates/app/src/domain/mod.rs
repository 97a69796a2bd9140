//! Field Service Domain Concerns

pub mod customers;
pub mod jobs;
pub mod payments;
pub mod time_entries;
