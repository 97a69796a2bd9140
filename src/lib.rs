//! Fieldwork
//!
//! Fieldwork is the accounting core of a field-service business: job status lifecycle,
//! invoice authorization, the partial-payment ledger and time clock arithmetic. It performs
//! no I/O; persistence and external services live in the application crates.

pub mod jobs;
pub mod money;
pub mod prelude;
pub mod receipt;
pub mod revenue;
pub mod technicians;
pub mod timeclock;
pub mod uuids;
