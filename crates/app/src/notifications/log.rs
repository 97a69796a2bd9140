//! Log-only notifier.

use async_trait::async_trait;
use tracing::info;

use super::{Notification, Notifier, NotifierError};

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError> {
        if !notification.has_recipient() {
            return Err(NotifierError::NoRecipient);
        }

        info!(
            phone = notification.phone.as_deref(),
            email = notification.email.as_deref(),
            subject = %notification.subject,
            body_len = notification.body.len(),
            "notification.logged"
        );

        Ok(())
    }
}
