//! Blocking HTTP plumbing shared by the notification channels.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use tracing::{error, info};

use crate::domain::error::NotificationError;
use crate::ports::notifier::DeliveryReceipt;

pub(crate) fn build_client(
    channel: &'static str,
    timeout: Duration,
) -> Result<Client, NotificationError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NotificationError::Transport {
            channel,
            reason: e.to_string(),
        })
}

/// Sends `request` once and maps the response to a receipt or an error.
pub(crate) fn deliver(
    channel: &'static str,
    request: RequestBuilder,
    extract_id: impl FnOnce(Response) -> Option<String>,
) -> Result<DeliveryReceipt, NotificationError> {
    let response = request.send().map_err(|e| NotificationError::Transport {
        channel,
        reason: e.to_string(),
    })?;

    let status = response.status();
    if status.is_success() {
        let message_id = extract_id(response);
        info!(channel, status = status.as_u16(), message_id = ?message_id, "notification sent");
        Ok(DeliveryReceipt {
            channel,
            status: status.as_u16(),
            message_id,
        })
    } else {
        let body = response.text().unwrap_or_default();
        error!(channel, status = status.as_u16(), "notification rejected: {}", body);
        Err(NotificationError::Rejected {
            channel,
            status: status.as_u16(),
            body,
        })
    }
}
