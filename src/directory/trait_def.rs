use super::models::{Subscriber, SubscriberFilter};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the directory service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("directory returned status {0}")]
    Status(u16),
}

/// Query access to the external subscriber directory.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Returns all subscriber records matching the filter, in the order the
    /// directory returns them.
    async fn select_subscribers(
        &self,
        filter: SubscriberFilter,
    ) -> Result<Vec<Subscriber>, DirectoryError>;
}
