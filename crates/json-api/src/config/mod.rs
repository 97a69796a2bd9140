//! Server configuration module

use clap::Parser;
use fieldwork_app::context::AppConfig;

use crate::config::{
    billing::{BillingConfig, BillingConfigError},
    db::DatabaseConfig,
    logging::LoggingConfig,
    notify::NotifyConfig,
    processor::ProcessorConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod billing;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod notify;
pub(crate) mod processor;
pub(crate) mod server;

/// Fieldwork JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "fieldwork-json", about = "Fieldwork JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Tax, card and time clock rules.
    #[command(flatten)]
    pub billing: BillingConfig,

    /// Card payment processor connection.
    #[command(flatten)]
    pub processor: ProcessorConfig,

    /// Receipt notifications.
    #[command(flatten)]
    pub notify: NotifyConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for wiring the application services.
    ///
    /// # Errors
    ///
    /// Returns an error when a billing value is out of range or the currency is unknown.
    pub fn app_config(&self) -> Result<AppConfig, BillingConfigError> {
        Ok(AppConfig {
            database_url: self.database.database_url.clone(),
            billing: self.billing.settings()?,
            processor: self.processor.to_processor_config(),
            notify_webhook_url: self.notify.notify_webhook_url.clone(),
            migrate: self.database.migrate,
        })
    }
}
