use super::models::{Subscriber, SubscriberFilter};
use super::trait_def::{DirectoryError, DirectoryStore};
use async_trait::async_trait;

/// Directory store that returns no subscribers.
///
/// Used when no directory service is configured so the daemon can still run
/// its schedules and serve status.
pub struct NullDirectoryStore;

#[async_trait]
impl DirectoryStore for NullDirectoryStore {
    async fn select_subscribers(
        &self,
        _filter: SubscriberFilter,
    ) -> Result<Vec<Subscriber>, DirectoryError> {
        Ok(Vec::new())
    }
}
