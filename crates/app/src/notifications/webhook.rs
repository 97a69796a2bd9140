//! Webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{Notification, Notifier, NotifierError};

/// Posts notifications as JSON to an SMS/email gateway.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError> {
        if !notification.has_recipient() {
            return Err(NotifierError::NoRecipient);
        }

        let response = self
            .client
            .post(&self.url)
            .json(&notification)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(NotifierError::Rejected(status.as_u16()));
        }

        debug!(subject = %notification.subject, "notification.sent");

        Ok(())
    }
}
