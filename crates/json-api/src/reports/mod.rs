//! Reports

pub(crate) mod revenue;
