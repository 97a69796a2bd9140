//! Persistence, services and external collaborators for the field service back office.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;
pub mod settings;

#[cfg(test)]
mod test;
