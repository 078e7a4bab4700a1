//! SMS notification channel over a Twilio-compatible REST API.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::adapters::http_channel::{build_client, deliver};
use crate::domain::config_validation::SmsConfig;
use crate::domain::error::NotificationError;
use crate::domain::summary::DEFAULT_SUBJECT;
use crate::ports::notifier::{DeliveryReceipt, Notifier};

const CHANNEL: &str = "sms";

pub struct SmsNotifier {
    config: SmsConfig,
    client: Client,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig, timeout: Duration) -> Result<Self, NotificationError> {
        Ok(Self {
            config,
            client: build_client(CHANNEL, timeout)?,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base, self.config.account_sid
        )
    }

    /// SMS has no subject line. A subject with content of its own is
    /// prepended; the generic default subject and a copy of the body are not.
    pub fn message_text(subject: Option<&str>, body: &str) -> String {
        match subject {
            Some(s) if !s.is_empty() && s != body && s != DEFAULT_SUBJECT => {
                format!("{s}\n{body}")
            }
            _ => body.to_string(),
        }
    }
}

impl Notifier for SmsNotifier {
    fn send(
        &self,
        subject: Option<&str>,
        body: &str,
    ) -> Result<DeliveryReceipt, NotificationError> {
        let text = Self::message_text(subject, body);
        debug!("Sending SMS to {}", self.config.to);

        let request = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", self.config.to.as_str()),
                ("From", self.config.from.as_str()),
                ("Body", text.as_str()),
            ]);

        deliver(CHANNEL, request, |response| {
            response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("sid").and_then(|s| s.as_str()).map(str::to_string))
        })
    }

    fn channel(&self) -> &'static str {
        CHANNEL
    }
}
