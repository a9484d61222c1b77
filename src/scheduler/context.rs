use super::state::SchedulerState;
use crate::directory::DirectoryStore;
use crate::processing::{ContentProcessor, NotificationProcessor, UpdatePolicy};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a job cycle needs: collaborator handles, the shared scheduler
/// state, and the shutdown token.
#[derive(Clone)]
pub struct JobContext {
    pub cancellation_token: CancellationToken,
    pub directory: Arc<dyn DirectoryStore>,
    pub content: Arc<dyn ContentProcessor>,
    pub notifier: Arc<dyn NotificationProcessor>,
    pub policy: Arc<dyn UpdatePolicy>,
    pub state: Arc<SchedulerState>,
}

impl JobContext {
    pub fn new(
        cancellation_token: CancellationToken,
        directory: Arc<dyn DirectoryStore>,
        content: Arc<dyn ContentProcessor>,
        notifier: Arc<dyn NotificationProcessor>,
        policy: Arc<dyn UpdatePolicy>,
        state: Arc<SchedulerState>,
    ) -> Self {
        Self {
            cancellation_token,
            directory,
            content,
            notifier,
            policy,
            state,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
