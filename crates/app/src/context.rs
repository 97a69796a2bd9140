//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        customers::{CustomerDirectory, PgCustomerDirectory},
        jobs::{JobsService, PgJobsService},
        payments::{
            CardPaymentsService, HttpPaymentProcessor, PaymentProcessorConfig,
            ProcessorCardPayments,
        },
        time_entries::{PgTimeClockService, TimeClockService},
    },
    notifications::{LogNotifier, Notifier, WebhookNotifier},
    settings::BillingSettings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Everything needed to wire the services together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub billing: BillingSettings,
    pub processor: PaymentProcessorConfig,
    /// Receipts are only logged when unset.
    pub notify_webhook_url: Option<String>,
    /// Apply pending migrations on start.
    pub migrate: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub settings: BillingSettings,
    pub jobs: Arc<dyn JobsService>,
    pub card_payments: Arc<dyn CardPaymentsService>,
    pub timeclock: Arc<dyn TimeClockService>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if config.migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool);

        let notifier: Arc<dyn Notifier> = match config.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url)),
            None => Arc::new(LogNotifier),
        };

        let customers: Arc<dyn CustomerDirectory> = Arc::new(PgCustomerDirectory::new(db.clone()));

        let jobs: Arc<dyn JobsService> = Arc::new(PgJobsService::new(
            db.clone(),
            config.billing,
            Arc::clone(&customers),
            notifier,
        ));

        Ok(Self {
            settings: config.billing,
            card_payments: Arc::new(ProcessorCardPayments::new(
                Arc::clone(&jobs),
                Arc::new(HttpPaymentProcessor::new(config.processor)),
                config.billing,
            )),
            timeclock: Arc::new(PgTimeClockService::new(
                db.clone(),
                config.billing.enforce_single_open_shift,
            )),
            auth: Arc::new(PgAuthService::new(&db)),
            jobs,
            customers,
        })
    }
}
