//! Webhook-backed reminder delivery.
//!
//! Each group carries a webhook URL pointing at its system channel (or
//! the first channel the bot may post in); reminders are posted there as
//! plain `{"content": ...}` JSON.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::DeliveryError;
use crate::scanner::{Group, Member, Notifier};

const WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

/// Posts reminders to per-group webhooks.
pub struct WebhookNotifier {
    client: Client,
    endpoints: HashMap<String, String>,
}

impl WebhookNotifier {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoints: HashMap::new(),
        }
    }

    /// Register a group's webhook URL.
    ///
    /// # Errors
    /// Rejects URLs that are not Discord webhook endpoints.
    pub fn add_endpoint(&mut self, group_id: &str, url: &str) -> Result<(), DeliveryError> {
        if !url.starts_with(WEBHOOK_PREFIX) {
            return Err(DeliveryError::Transport(format!(
                "invalid webhook URL for group {group_id}: must start with {WEBHOOK_PREFIX}"
            )));
        }
        self.endpoints.insert(group_id.to_string(), url.to_string());
        Ok(())
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        group: &Group,
        _member: &Member,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let url = self
            .endpoints
            .get(&group.id)
            .ok_or_else(|| DeliveryError::NoChannel {
                group: group.name.clone(),
            })?;

        let body = json!({ "content": text });
        let resp = self.client.post(url).json(&body).send().await?;

        if resp.status().is_success() || resp.status().as_u16() == 204 {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected { status, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_webhook_urls() {
        let mut notifier = WebhookNotifier::new();
        assert!(notifier.add_endpoint("g", "https://example.com/hook").is_err());
        assert!(notifier
            .add_endpoint("g", "https://discord.com/api/webhooks/1/abc")
            .is_ok());
    }

    #[tokio::test]
    async fn unknown_group_has_no_channel() {
        let notifier = WebhookNotifier::new();
        let group = Group {
            id: "g".to_string(),
            name: "group".to_string(),
            members: Vec::new(),
        };
        let member = Member {
            id: "m".to_string(),
            display_name: "m".to_string(),
            is_bot: false,
        };
        let err = notifier.notify(&group, &member, "hi").await.unwrap_err();
        assert!(matches!(err, DeliveryError::NoChannel { .. }));
    }
}
