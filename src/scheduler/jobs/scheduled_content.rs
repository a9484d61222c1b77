use crate::config::JobsSettings;
use crate::directory::SubscriberFilter;
use crate::scheduler::context::JobContext;
use crate::scheduler::job::{JobError, RecurringJob};
use crate::scheduler::state::JobId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, error, info};

/// Regular content refresh over all pro subscribers, one at a time.
pub struct ScheduledContentJob {
    interval: Duration,
}

impl ScheduledContentJob {
    pub fn from_settings(settings: &JobsSettings) -> Self {
        Self::with_interval(Duration::from_secs(settings.scheduled_content_interval_secs))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl RecurringJob for ScheduledContentJob {
    fn id(&self) -> JobId {
        JobId::ScheduledContent
    }

    fn name(&self) -> &'static str {
        "scheduled_content"
    }

    fn next_delay(&self, _now: DateTime<Utc>) -> Duration {
        self.interval
    }

    async fn run_cycle(&self, ctx: &JobContext) -> Result<(), JobError> {
        let subscribers = ctx.directory.select_subscribers(SubscriberFilter::pro()).await?;
        info!("Scheduled content cycle over {} subscribers", subscribers.len());

        // Once a cycle has started it runs to completion; shutdown only
        // prevents future cycles from being armed.
        let now = Utc::now();
        for subscriber in &subscribers {
            if !ctx.policy.needs_scheduled_update(subscriber, now) {
                continue;
            }
            let Some(_lock) = ctx.state.locks().acquire(&subscriber.id) else {
                debug!("Subscriber {} locked, skipping", subscriber.id);
                continue;
            };
            if let Err(e) = ctx.content.process(subscriber, false).await {
                error!("Content refresh failed for subscriber {}: {}", subscriber.id, e);
            }
        }
        Ok(())
    }
}
