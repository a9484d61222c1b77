//! Shared test doubles for job and processing tests.

use super::context::JobContext;
use super::locks::LockRegistry;
use super::state::SchedulerState;
use crate::directory::{
    DirectoryError, DirectoryStore, Subscriber, SubscriberFilter, SubscriberId,
};
use crate::processing::{ContentProcessor, NotificationProcessor, ProcessingError, UpdatePolicy};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub fn subscriber(id: &str) -> Subscriber {
    Subscriber {
        id: SubscriberId::from(id),
        is_pro: true,
        telegram_chat_id: None,
        watchlist: vec![],
        sectors: vec![],
        narratives: vec![],
        preferences_updated_at: None,
        last_content_update_at: None,
        last_telegram_sent_at: None,
    }
}

pub fn subscriber_with_chat(id: &str, chat_id: &str) -> Subscriber {
    Subscriber {
        telegram_chat_id: Some(chat_id.to_string()),
        ..subscriber(id)
    }
}

/// Directory returning a fixed set of subscribers, with a failure switch.
pub struct StaticDirectory {
    subscribers: Vec<Subscriber>,
    fail: AtomicBool,
}

impl StaticDirectory {
    pub fn new(subscribers: Vec<Subscriber>) -> Self {
        Self {
            subscribers,
            fail: AtomicBool::new(false),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl DirectoryStore for StaticDirectory {
    async fn select_subscribers(
        &self,
        filter: SubscriberFilter,
    ) -> Result<Vec<Subscriber>, DirectoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DirectoryError::Status(500));
        }
        Ok(self
            .subscribers
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedCall {
    pub id: SubscriberId,
    pub force: bool,
    pub started_at: Instant,
    pub finished_at: Instant,
}

/// Content processor recording every call, with configurable per-call delay
/// and failure injection. Tracks the maximum number of concurrently active
/// calls to observe sequential versus concurrent dispatch.
pub struct RecordingProcessor {
    delay: Duration,
    delays: Mutex<HashMap<SubscriberId, Duration>>,
    fail_ids: Mutex<HashSet<SubscriberId>>,
    pub calls: Mutex<Vec<ProcessedCall>>,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl RecordingProcessor {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            delays: Mutex::new(HashMap::new()),
            fail_ids: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn set_delay_for(&self, id: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(SubscriberId::from(id), delay);
    }

    pub fn fail_for(&self, id: &str) {
        self.fail_ids.lock().unwrap().insert(SubscriberId::from(id));
    }

    pub fn processed_ids(&self) -> Vec<SubscriberId> {
        self.calls.lock().unwrap().iter().map(|c| c.id.clone()).collect()
    }
}

#[async_trait]
impl ContentProcessor for RecordingProcessor {
    async fn process(&self, subscriber: &Subscriber, force: bool) -> Result<(), ProcessingError> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        let started_at = Instant::now();
        let delay = self
            .delays
            .lock()
            .unwrap()
            .get(&subscriber.id)
            .copied()
            .unwrap_or(self.delay);
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(ProcessedCall {
            id: subscriber.id.clone(),
            force,
            started_at,
            finished_at: Instant::now(),
        });

        if self.fail_ids.lock().unwrap().contains(&subscriber.id) {
            return Err(ProcessingError::Status(500));
        }
        Ok(())
    }
}

/// Notifier recording every call and probing the lock registry to verify it
/// is the shared one.
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<SubscriberId>>,
    pub lock_probe_failures: AtomicUsize,
    fail_ids: Mutex<HashSet<SubscriberId>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            lock_probe_failures: AtomicUsize::new(0),
            fail_ids: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_for(&self, id: &str) {
        self.fail_ids.lock().unwrap().insert(SubscriberId::from(id));
    }
}

#[async_trait]
impl NotificationProcessor for RecordingNotifier {
    async fn process(
        &self,
        subscriber: &Subscriber,
        locks: &LockRegistry,
    ) -> Result<(), ProcessingError> {
        match locks.acquire(&subscriber.id) {
            Some(_lock) => {
                self.calls.lock().unwrap().push(subscriber.id.clone());
            }
            None => {
                self.lock_probe_failures.fetch_add(1, Ordering::SeqCst);
                return Ok(());
            }
        }
        if self.fail_ids.lock().unwrap().contains(&subscriber.id) {
            return Err(ProcessingError::Status(500));
        }
        Ok(())
    }
}

/// Policy approving every subscriber for both kinds of refresh.
pub struct AlwaysPolicy;

impl UpdatePolicy for AlwaysPolicy {
    fn needs_scheduled_update(&self, _subscriber: &Subscriber, _now: DateTime<Utc>) -> bool {
        true
    }

    fn needs_immediate_update(&self, _subscriber: &Subscriber, _now: DateTime<Utc>) -> bool {
        true
    }
}

pub fn test_context(directory: StaticDirectory, state: Arc<SchedulerState>) -> JobContext {
    full_context(
        Arc::new(directory),
        Arc::new(RecordingProcessor::new()),
        Arc::new(RecordingNotifier::new()),
        state,
    )
}

pub fn full_context(
    directory: Arc<StaticDirectory>,
    processor: Arc<RecordingProcessor>,
    notifier: Arc<RecordingNotifier>,
    state: Arc<SchedulerState>,
) -> JobContext {
    JobContext::new(
        CancellationToken::new(),
        directory,
        processor,
        notifier,
        Arc::new(AlwaysPolicy),
        state,
    )
}
