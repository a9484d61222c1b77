use super::trait_def::{ContentProcessor, NotificationProcessor, ProcessingError};
use crate::directory::Subscriber;
use crate::scheduler::LockRegistry;
use async_trait::async_trait;

/// Content processor that does nothing, used when no processor service is
/// configured.
pub struct NoOpContentProcessor;

#[async_trait]
impl ContentProcessor for NoOpContentProcessor {
    async fn process(&self, _subscriber: &Subscriber, _force: bool) -> Result<(), ProcessingError> {
        Ok(())
    }
}

/// Notifier that does nothing.
pub struct NoOpNotifier;

#[async_trait]
impl NotificationProcessor for NoOpNotifier {
    async fn process(
        &self,
        _subscriber: &Subscriber,
        _locks: &LockRegistry,
    ) -> Result<(), ProcessingError> {
        Ok(())
    }
}
