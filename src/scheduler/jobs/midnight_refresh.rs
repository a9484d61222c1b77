use crate::directory::SubscriberFilter;
use crate::scheduler::context::JobContext;
use crate::scheduler::daily_anchor::delay_until_next_midnight;
use crate::scheduler::job::{JobError, RecurringJob};
use crate::scheduler::state::JobId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, error, info};

/// Forced refresh of every pro subscriber at local midnight in the reference
/// timezone. Unlike the interval jobs this one fans out concurrently, one
/// task per subscriber, and waits for all of them.
pub struct MidnightRefreshJob {
    timezone: Tz,
}

impl MidnightRefreshJob {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

#[async_trait]
impl RecurringJob for MidnightRefreshJob {
    fn id(&self) -> JobId {
        JobId::MidnightRefresh
    }

    fn name(&self) -> &'static str {
        "midnight_refresh"
    }

    fn next_delay(&self, now: DateTime<Utc>) -> Duration {
        delay_until_next_midnight(self.timezone, now)
    }

    async fn run_cycle(&self, ctx: &JobContext) -> Result<(), JobError> {
        let subscribers = ctx.directory.select_subscribers(SubscriberFilter::pro()).await?;
        info!("Midnight refresh over {} subscribers", subscribers.len());

        let tasks = subscribers.iter().map(|subscriber| async move {
            let Some(_lock) = ctx.state.locks().acquire(&subscriber.id) else {
                debug!("Subscriber {} locked, skipping midnight refresh", subscriber.id);
                return;
            };
            if let Err(e) = ctx.content.process(subscriber, true).await {
                error!("Midnight refresh failed for subscriber {}: {}", subscriber.id, e);
            }
        });
        join_all(tasks).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SubscriberId;
    use crate::scheduler::testing::{
        full_context, subscriber, RecordingNotifier, RecordingProcessor, StaticDirectory,
    };
    use crate::scheduler::SchedulerState;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Instant;

    fn job() -> MidnightRefreshJob {
        MidnightRefreshJob::new(chrono_tz::America::New_York)
    }

    #[tokio::test]
    async fn test_refreshes_run_concurrently_with_force() {
        let directory = Arc::new(StaticDirectory::new(vec![
            subscriber("sub-1"),
            subscriber("sub-2"),
            subscriber("sub-3"),
        ]));
        let processor = Arc::new(RecordingProcessor::with_delay(Duration::from_millis(50)));
        let ctx = full_context(
            directory,
            processor.clone(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(SchedulerState::new()),
        );

        let started = Instant::now();
        job().run_cycle(&ctx).await.unwrap();
        let elapsed = started.elapsed();

        let calls = processor.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.force));
        // Concurrent fan-out finishes in roughly one delay, not three.
        assert!(elapsed < Duration::from_millis(120), "elapsed {elapsed:?}");
        assert!(processor.max_active.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_waits_for_the_slowest_subscriber() {
        let directory = Arc::new(StaticDirectory::new(vec![
            subscriber("sub-fast"),
            subscriber("sub-slow"),
        ]));
        let processor = Arc::new(RecordingProcessor::new());
        processor.set_delay_for("sub-slow", Duration::from_millis(80));
        let ctx = full_context(
            directory,
            processor.clone(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(SchedulerState::new()),
        );

        let started = Instant::now();
        job().run_cycle(&ctx).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(80));
        assert_eq!(processor.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_locked_subscriber_is_skipped_and_lock_kept() {
        let directory = Arc::new(StaticDirectory::new(vec![
            subscriber("sub-1"),
            subscriber("sub-2"),
        ]));
        let processor = Arc::new(RecordingProcessor::new());
        let state = Arc::new(SchedulerState::new());
        state.locks().try_acquire(&SubscriberId::from("sub-2"));
        let ctx = full_context(
            directory,
            processor.clone(),
            Arc::new(RecordingNotifier::new()),
            state.clone(),
        );

        job().run_cycle(&ctx).await.unwrap();

        assert_eq!(processor.processed_ids(), vec![SubscriberId::from("sub-1")]);
        assert!(state.locks().is_locked(&SubscriberId::from("sub-2")));
    }

    #[tokio::test]
    async fn test_failures_do_not_leak_locks() {
        let directory = Arc::new(StaticDirectory::new(vec![
            subscriber("sub-1"),
            subscriber("sub-2"),
        ]));
        let processor = Arc::new(RecordingProcessor::new());
        processor.fail_for("sub-1");
        let state = Arc::new(SchedulerState::new());
        let ctx = full_context(
            directory,
            processor.clone(),
            Arc::new(RecordingNotifier::new()),
            state.clone(),
        );

        job().run_cycle(&ctx).await.unwrap();

        assert_eq!(processor.calls.lock().unwrap().len(), 2);
        assert!(state.locks().snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_directory_failure_aborts_the_cycle() {
        let directory = Arc::new(StaticDirectory::new(vec![subscriber("sub-1")]));
        directory.set_failing(true);
        let processor = Arc::new(RecordingProcessor::new());
        let ctx = full_context(
            directory,
            processor.clone(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(SchedulerState::new()),
        );

        let result = job().run_cycle(&ctx).await;
        assert!(matches!(result, Err(JobError::Directory(_))));
        assert!(processor.calls.lock().unwrap().is_empty());
    }
}
