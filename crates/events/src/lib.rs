//! Chat notifications for pipeline events.
//!
//! - [`delivery::webhook::WebhookDelivery`] — POSTs JSON to a webhook URL.
//! - [`slack`] — builds Slack Block Kit messages from
//!   [`Notification`](promptsheet_core::notification::Notification)s.
//! - [`SlackNotifier`] — the
//!   [`Notifier`](promptsheet_core::ports::Notifier) used in production.

pub mod delivery;
pub mod notifier;
pub mod slack;

pub use delivery::webhook::WebhookDelivery;
pub use notifier::SlackNotifier;
