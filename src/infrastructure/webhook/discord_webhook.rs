//! Outbound Discord-style webhook notifier (C7). Delivery is fire-and-forget:
//! the POST is spawned as a detached task and its result discarded, so a
//! slow or unreachable webhook endpoint never blocks a request.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{WebhookEvent, WebhookNotifier};

const CONTENT_CAP: usize = 1_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

pub struct DiscordWebhookNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordWebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with static config");
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl WebhookNotifier for DiscordWebhookNotifier {
    async fn notify(&self, event: WebhookEvent) {
        let Some(url) = self.webhook_url.clone() else {
            tracing::debug!(title = %event.title, "webhook not configured, dropping notification");
            return;
        };

        let mut content = format!("**{}**\n{}", event.title, event.description);
        content.truncate(CONTENT_CAP);

        let client = self.client.clone();
        tokio::spawn(async move {
            let body = serde_json::json!({ "content": content });
            if let Err(err) = client.post(&url).json(&body).send().await {
                tracing::debug!(error = %err, "webhook delivery failed");
            }
        });
    }
}
