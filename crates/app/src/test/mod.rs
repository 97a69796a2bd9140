//! Shared fixtures for database-backed service tests.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
