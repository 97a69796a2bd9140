//! Customer notifications (receipts and reminders).

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use thiserror::Error;

mod log;
mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

/// A message for a customer. Channels pick whichever contact they can use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Whether there is anyone to deliver to.
    #[must_use]
    pub fn has_recipient(&self) -> bool {
        self.phone.as_deref().is_some_and(|phone| !phone.trim().is_empty())
            || self.email.as_deref().is_some_and(|email| !email.trim().is_empty())
    }
}

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("notification has no phone number or email")]
    NoRecipient,

    #[error("notification request failed")]
    Http(#[from] reqwest::Error),

    #[error("notification gateway responded with status {0}")]
    Rejected(u16),
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError>;
}
