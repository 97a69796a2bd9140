//! Payment Processor Config

use clap::Args;
use fieldwork_app::domain::payments::PaymentProcessorConfig;

/// Card payment processor connection.
#[derive(Debug, Args)]
pub struct ProcessorConfig {
    /// Payment processor API base URL
    #[arg(long, env = "PAYMENT_PROCESSOR_URL")]
    pub payment_processor_url: String,

    /// Payment processor secret key
    #[arg(long, env = "PAYMENT_PROCESSOR_KEY", hide_env_values = true)]
    pub payment_processor_key: String,
}

impl ProcessorConfig {
    /// Client settings for the HTTP processor.
    #[must_use]
    pub fn to_processor_config(&self) -> PaymentProcessorConfig {
        PaymentProcessorConfig {
            url: self.payment_processor_url.clone(),
            api_key: self.payment_processor_key.clone(),
        }
    }
}
