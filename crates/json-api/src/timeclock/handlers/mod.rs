//! Time Clock Handlers

pub(crate) mod clock_in;
pub(crate) mod edit;
pub(crate) mod entries;
pub(crate) mod punch;
pub(crate) mod report;
