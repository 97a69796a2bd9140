//! Job Handlers

pub(crate) mod authorize;
pub(crate) mod balance;
pub(crate) mod card;
pub(crate) mod check_photo;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod draft;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod payments;
pub(crate) mod status;
pub(crate) mod update;
