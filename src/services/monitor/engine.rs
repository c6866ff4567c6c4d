use std::sync::Arc;

use crate::config::Config;
use crate::services::monitor::parser::parse_status;
use crate::services::monitor::strategy::RetryPeriod;
use crate::services::monitor::types::MonitorError;
use crate::services::practicum::{PracticumClient, StatusSource};
use crate::services::telegram::{Notifier, TelegramNotifier};

/// Prefix of the message sent when a poll fails
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Telegram rejects messages longer than this many characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Observable result of one loop iteration
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A new status message was delivered
    Notified(String),
    /// Status text equals the last delivered one
    Unchanged,
    /// The report held no homework
    NoPendingWork,
    /// Poll failed; `notified` tells whether the failure message was delivered now
    Failed { message: String, notified: bool },
    /// A notification was due but could not be delivered
    DeliveryFailed(String),
}

/// Polls the status source and forwards changes to the notifier
pub struct MonitorEngine {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    retry: RetryPeriod,
    cursor: i64,
    advance_cursor: bool,
    last_status: Option<String>,
    last_error: Option<String>,
}

impl MonitorEngine {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        retry: RetryPeriod,
        cursor: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            retry,
            cursor,
            advance_cursor: false,
            last_status: None,
            last_error: None,
        }
    }

    /// Wire the Practicum client and Telegram notifier from configuration
    pub fn from_config(config: &Config) -> Self {
        let source = PracticumClient::new(
            config.practicum_token.clone(),
            config.practicum_endpoint.clone(),
            config.request_timeout,
        );
        let notifier = TelegramNotifier::new(
            config.telegram_api_base.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
            config.request_timeout,
        );
        let cursor = chrono::Utc::now().timestamp() - config.lookback_secs;

        Self::new(
            Arc::new(source),
            Arc::new(notifier),
            RetryPeriod::new(config.retry_period, config.retry_jitter),
            cursor,
        )
        .with_advancing_cursor(config.advance_cursor)
    }

    /// Move the cursor to the server's `current_date` after each successful poll
    pub fn with_advancing_cursor(mut self, enabled: bool) -> Self {
        self.advance_cursor = enabled;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start the polling loop. Never returns.
    pub async fn run(mut self) {
        tracing::info!(
            "Homework monitor started (cursor={}, period={:?})",
            self.cursor,
            self.retry.period
        );

        loop {
            self.tick().await;

            let delay = self.retry.next_delay();
            tracing::debug!("Next poll in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// One poll: fetch, detect change, notify
    pub async fn tick(&mut self) -> TickOutcome {
        match self.check().await {
            Ok(update) => {
                // A healthy poll ends the failure streak
                self.last_error = None;
                self.on_status(update).await
            }
            Err(e) => self.on_failure(e).await,
        }
    }

    async fn on_status(&mut self, update: Option<String>) -> TickOutcome {
        let Some(text) = update else {
            tracing::debug!("No homework under review");
            return TickOutcome::NoPendingWork;
        };

        if self.last_status.as_deref() == Some(text.as_str()) {
            tracing::debug!("Homework status unchanged");
            return TickOutcome::Unchanged;
        }

        tracing::info!("Homework status changed: {}", text);
        if !self.deliver(&text).await {
            return TickOutcome::DeliveryFailed(text);
        }

        self.last_status = Some(text.clone());
        TickOutcome::Notified(text)
    }

    async fn on_failure(&mut self, error: MonitorError) -> TickOutcome {
        tracing::error!("Poll failed: {}", error);

        let message = failure_message(&error);
        if self.last_error.as_deref() == Some(message.as_str()) {
            return TickOutcome::Failed {
                message,
                notified: false,
            };
        }

        let notified = self.deliver(&message).await;
        if notified {
            self.last_error = Some(message.clone());
        }
        TickOutcome::Failed { message, notified }
    }

    async fn check(&mut self) -> Result<Option<String>, MonitorError> {
        let report = self.source.fetch(self.cursor).await?;

        if self.advance_cursor {
            if let Some(current_date) = report.current_date {
                self.cursor = current_date;
            }
        }

        parse_status(&report)
    }

    async fn deliver(&self, text: &str) -> bool {
        match self.notifier.send(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        }
    }
}

/// Failure text sent to the recipient, cut to fit a single chat message
pub fn failure_message(error: &MonitorError) -> String {
    let message = format!("{}: {}", FAILURE_PREFIX, error);
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message;
    }

    let mut truncated: String = message.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    truncated.push('…');
    truncated
}
