use crate::config::JobsSettings;
use crate::directory::SubscriberFilter;
use crate::scheduler::context::JobContext;
use crate::scheduler::job::{JobError, RecurringJob};
use crate::scheduler::state::JobId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::error;

/// Notification pass over pro subscribers with a Telegram channel, one at a
/// time. Cooldown and lock checks live in the notifier, which gets the
/// shared registry so delivery and content refresh exclude each other.
pub struct TelegramJob {
    interval: Duration,
}

impl TelegramJob {
    pub fn from_settings(settings: &JobsSettings) -> Self {
        Self::with_interval(Duration::from_secs(settings.telegram_interval_secs))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl RecurringJob for TelegramJob {
    fn id(&self) -> JobId {
        JobId::Telegram
    }

    fn name(&self) -> &'static str {
        "telegram"
    }

    fn next_delay(&self, _now: DateTime<Utc>) -> Duration {
        self.interval
    }

    async fn run_cycle(&self, ctx: &JobContext) -> Result<(), JobError> {
        let subscribers = ctx
            .directory
            .select_subscribers(SubscriberFilter::pro_with_channel())
            .await?;

        for subscriber in &subscribers {
            if let Err(e) = ctx.notifier.process(subscriber, ctx.state.locks()).await {
                error!("Notification failed for subscriber {}: {}", subscriber.id, e);
            }
        }
        Ok(())
    }
}
