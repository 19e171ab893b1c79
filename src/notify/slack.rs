// src/notify/slack.rs
use std::time::Duration;

use metrics::counter;
use reqwest::Client;

use super::Notifier;
use crate::error::RelayError;
use crate::payload::NotificationPayload;

pub struct SlackNotifier {
    webhook_url: Option<String>,
    client: Client,
    timeout: Duration,
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("SLACK_WEBHOOK").ok())
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), RelayError> {
        let Some(url) = &self.webhook_url else {
            tracing::debug!("Slack disabled (no webhook URL)");
            return Ok(());
        };

        let rsp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                counter!("relay_delivery_failures_total").increment(1);
                RelayError::Delivery(format!("slack post: {e}"))
            })?;

        if let Err(e) = rsp.error_for_status_ref() {
            counter!("relay_delivery_failures_total").increment(1);
            return Err(RelayError::Delivery(format!("slack non-2xx: {e}")));
        }

        tracing::debug!(
            attachments = payload.attachments.len(),
            dialect = payload.dialect.as_str(),
            "payload delivered to Slack"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}
