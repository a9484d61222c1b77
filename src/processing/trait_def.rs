use crate::directory::Subscriber;
use crate::scheduler::LockRegistry;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from downstream processing services.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("processing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("processor returned status {0}")]
    Status(u16),
}

/// Triggers a content refresh for one subscriber.
#[async_trait]
pub trait ContentProcessor: Send + Sync {
    /// Refresh the subscriber's content. `force` bypasses any freshness
    /// checks the processor applies on its side.
    async fn process(&self, subscriber: &Subscriber, force: bool) -> Result<(), ProcessingError>;
}

/// Dispatches a notification to one subscriber.
///
/// The notifier receives the shared lock registry because notification
/// delivery counts as processing: a subscriber being refreshed must not be
/// notified concurrently, and vice versa.
#[async_trait]
pub trait NotificationProcessor: Send + Sync {
    async fn process(
        &self,
        subscriber: &Subscriber,
        locks: &LockRegistry,
    ) -> Result<(), ProcessingError>;
}
