use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Delivers plain-text messages to the configured recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Telegram Bot API sender
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_base: String, token: String, chat_id: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            chat_id,
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::DeliveryFailed(e.without_url().to_string()))?;

        let status = response.status();
        let reply: serde_json::Value = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let description = reply
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("no description");
            return Err(NotifyError::DeliveryFailed(format!(
                "Telegram returned {}: {}",
                status, description
            )));
        }

        if reply.get("ok").and_then(|ok| ok.as_bool()) == Some(false) {
            return Err(NotifyError::DeliveryFailed(format!(
                "Telegram rejected message: {}",
                reply
            )));
        }

        tracing::debug!("Telegram message sent to chat {}", self.chat_id);
        Ok(())
    }
}
