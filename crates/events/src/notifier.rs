//! Slack webhook notifier.

use async_trait::async_trait;
use promptsheet_core::notification::Notification;
use promptsheet_core::ports::Notifier;
use promptsheet_core::CoreError;

use crate::delivery::webhook::WebhookDelivery;
use crate::slack::build_message;

/// Posts pipeline events to a Slack incoming webhook.
///
/// An empty webhook URL disables delivery. Mode filtering happens in the
/// pipeline before [`Notifier::notify`] is called.
pub struct SlackNotifier {
    webhook_url: String,
    delivery: WebhookDelivery,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, delivery: WebhookDelivery) -> Self {
        Self {
            webhook_url: webhook_url.into().trim().to_string(),
            delivery,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, event: &Notification) -> Result<(), CoreError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let payload = build_message(event);
        self.delivery
            .deliver(&self.webhook_url, &payload)
            .await
            .map_err(|e| CoreError::Notification(e.to_string()))?;

        tracing::debug!(row = event.row_number(), "Slack notification sent");
        Ok(())
    }
}
