//! Notification Config

use clap::Args;

/// Receipt notification settings.
#[derive(Debug, Args)]
pub struct NotifyConfig {
    /// Webhook receiving receipt notifications; receipts are only logged when unset
    #[arg(long, env = "NOTIFY_WEBHOOK_URL")]
    pub notify_webhook_url: Option<String>,
}
