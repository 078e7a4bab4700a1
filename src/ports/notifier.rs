//! Notification channel port trait.

use crate::domain::error::NotificationError;

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub channel: &'static str,
    pub status: u16,
    /// Provider message id, when the provider returns one.
    pub message_id: Option<String>,
}

/// Outbound message channel. Failures are returned, never retried.
pub trait Notifier {
    fn send(
        &self,
        subject: Option<&str>,
        body: &str,
    ) -> Result<DeliveryReceipt, NotificationError>;

    fn channel(&self) -> &'static str;
}
