//! Telegram notification dispatch with per-subscriber cooldown.

use super::trait_def::{NotificationProcessor, ProcessingError};
use crate::directory::Subscriber;
use crate::scheduler::LockRegistry;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct NotifyRequest {
    chat_id: String,
}

/// Notifier backed by the processor service's notify endpoint.
///
/// Skips subscribers without a chat id, subscribers notified within the
/// cooldown window, and subscribers currently locked by another job. All
/// skips are silent successes so one subscriber never blocks the pass.
pub struct TelegramNotifier {
    client: reqwest::Client,
    base_url: String,
    cooldown: ChronoDuration,
}

impl TelegramNotifier {
    pub fn new(base_url: String, timeout_sec: u64, cooldown_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            cooldown: ChronoDuration::seconds(cooldown_secs as i64),
        }
    }

    fn within_cooldown(&self, subscriber: &Subscriber) -> bool {
        match subscriber.last_telegram_sent_at {
            Some(sent_at) => Utc::now() - sent_at < self.cooldown,
            None => false,
        }
    }
}

#[async_trait]
impl NotificationProcessor for TelegramNotifier {
    async fn process(
        &self,
        subscriber: &Subscriber,
        locks: &LockRegistry,
    ) -> Result<(), ProcessingError> {
        let Some(chat_id) = subscriber.telegram_chat_id.clone() else {
            return Ok(());
        };

        if self.within_cooldown(subscriber) {
            debug!("Subscriber {} within notification cooldown, skipping", subscriber.id);
            return Ok(());
        }

        let Some(_lock) = locks.acquire(&subscriber.id) else {
            debug!("Subscriber {} locked by another job, skipping notification", subscriber.id);
            return Ok(());
        };

        let url = format!("{}/v1/subscriber/{}/notify", self.base_url, subscriber.id);
        let response = self
            .client
            .post(&url)
            .json(&NotifyRequest { chat_id })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProcessingError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
