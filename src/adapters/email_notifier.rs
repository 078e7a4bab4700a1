//! Email notification channel over a SendGrid-compatible v3 mail API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;

use crate::adapters::http_channel::{build_client, deliver};
use crate::domain::config_validation::EmailConfig;
use crate::domain::error::NotificationError;
use crate::domain::summary::DEFAULT_SUBJECT;
use crate::ports::notifier::{DeliveryReceipt, Notifier};

const CHANNEL: &str = "email";

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

pub struct EmailNotifier {
    config: EmailConfig,
    client: Client,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig, timeout: Duration) -> Result<Self, NotificationError> {
        Ok(Self {
            config,
            client: build_client(CHANNEL, timeout)?,
        })
    }

    fn payload<'a>(&'a self, subject: Option<&'a str>, body: &'a str) -> MailRequest<'a> {
        MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &self.config.to,
                }],
            }],
            from: Address {
                email: &self.config.from,
            },
            subject: subject.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SUBJECT),
            content: vec![Content {
                kind: "text/plain",
                value: body,
            }],
        }
    }
}

impl Notifier for EmailNotifier {
    fn send(
        &self,
        subject: Option<&str>,
        body: &str,
    ) -> Result<DeliveryReceipt, NotificationError> {
        debug!("Sending email to {}", self.config.to);

        let request = self
            .client
            .post(format!("{}/v3/mail/send", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(subject, body));

        deliver(CHANNEL, request, |response| {
            response
                .headers()
                .get("x-message-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
    }

    fn channel(&self) -> &'static str {
        CHANNEL
    }
}
