use crate::config::JobsSettings;
use crate::directory::SubscriberFilter;
use crate::scheduler::context::JobContext;
use crate::scheduler::job::{JobError, RecurringJob};
use crate::scheduler::state::JobId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, error};

/// Short-interval sweep catching subscribers whose preferences changed since
/// their last refresh, so they get updated content without waiting for the
/// regular cycle.
pub struct ImmediateCheckJob {
    interval: Duration,
}

impl ImmediateCheckJob {
    pub fn from_settings(settings: &JobsSettings) -> Self {
        Self::with_interval(Duration::from_secs(settings.immediate_check_interval_secs))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl RecurringJob for ImmediateCheckJob {
    fn id(&self) -> JobId {
        JobId::ImmediateCheck
    }

    fn name(&self) -> &'static str {
        "immediate_check"
    }

    fn next_delay(&self, _now: DateTime<Utc>) -> Duration {
        self.interval
    }

    async fn run_cycle(&self, ctx: &JobContext) -> Result<(), JobError> {
        let subscribers = ctx.directory.select_subscribers(SubscriberFilter::pro()).await?;

        let now = Utc::now();
        for subscriber in &subscribers {
            if !ctx.policy.needs_immediate_update(subscriber, now) {
                continue;
            }
            let Some(_lock) = ctx.state.locks().acquire(&subscriber.id) else {
                debug!("Subscriber {} locked, skipping", subscriber.id);
                continue;
            };
            debug!("Immediate refresh for subscriber {}", subscriber.id);
            if let Err(e) = ctx.content.process(subscriber, false).await {
                error!("Immediate refresh failed for subscriber {}: {}", subscriber.id, e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SubscriberId;
    use crate::processing::{StalenessPolicy, UpdatePolicy};
    use crate::scheduler::testing::{
        subscriber, AlwaysPolicy, RecordingNotifier, RecordingProcessor, StaticDirectory,
    };
    use crate::scheduler::{JobContext, SchedulerState};
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    fn job() -> ImmediateCheckJob {
        ImmediateCheckJob::with_interval(Duration::from_secs(300))
    }

    fn context_with_policy(
        directory: StaticDirectory,
        processor: Arc<RecordingProcessor>,
        policy: Arc<dyn UpdatePolicy>,
    ) -> JobContext {
        JobContext::new(
            CancellationToken::new(),
            Arc::new(directory),
            processor,
            Arc::new(RecordingNotifier::new()),
            policy,
            Arc::new(SchedulerState::new()),
        )
    }

    #[tokio::test]
    async fn test_only_recently_changed_subscribers_are_refreshed() {
        let now = Utc::now();
        let mut changed = subscriber("sub-changed");
        changed.last_content_update_at = Some(now - ChronoDuration::hours(2));
        changed.preferences_updated_at = Some(now - ChronoDuration::minutes(10));
        let mut settled = subscriber("sub-settled");
        settled.last_content_update_at = Some(now - ChronoDuration::minutes(5));
        settled.preferences_updated_at = Some(now - ChronoDuration::minutes(30));

        let processor = Arc::new(RecordingProcessor::new());
        let policy = Arc::new(StalenessPolicy::new(
            ChronoDuration::hours(24),
            ChronoDuration::minutes(60),
        ));
        let ctx = context_with_policy(
            StaticDirectory::new(vec![changed, settled]),
            processor.clone(),
            policy,
        );

        job().run_cycle(&ctx).await.unwrap();

        assert_eq!(
            processor.processed_ids(),
            vec![SubscriberId::from("sub-changed")]
        );
    }

    #[tokio::test]
    async fn test_sequential_dispatch() {
        let processor = Arc::new(RecordingProcessor::with_delay(Duration::from_millis(5)));
        let ctx = context_with_policy(
            StaticDirectory::new(vec![
                subscriber("sub-1"),
                subscriber("sub-2"),
                subscriber("sub-3"),
            ]),
            processor.clone(),
            Arc::new(AlwaysPolicy),
        );

        job().run_cycle(&ctx).await.unwrap();

        assert_eq!(processor.calls.lock().unwrap().len(), 3);
        assert_eq!(processor.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_directory_failure_aborts_the_cycle() {
        let directory = StaticDirectory::new(vec![subscriber("sub-1")]);
        directory.set_failing(true);
        let processor = Arc::new(RecordingProcessor::new());
        let ctx = context_with_policy(directory, processor.clone(), Arc::new(AlwaysPolicy));

        let result = job().run_cycle(&ctx).await;
        assert!(matches!(result, Err(JobError::Directory(_))));
        assert!(processor.calls.lock().unwrap().is_empty());
    }
}
