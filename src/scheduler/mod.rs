//! Recurring job scheduling: the job trait and runner, the four concrete
//! jobs, cross-job subscriber locking, and the shared state exposed over the
//! status endpoint.

mod context;
mod daily_anchor;
mod job;
pub mod jobs;
mod locks;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use context::JobContext;
pub use daily_anchor::{delay_until_next_midnight, next_midnight_instant, resolve_local};
pub use job::{JobError, JobRunner, RecurringJob};
pub use locks::{LockRegistry, SubscriberLock};
pub use state::{JobId, JobStatus, SchedulerState, StatusSnapshot};
