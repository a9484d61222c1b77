//! MarketPulse Subscriber Scheduler Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod directory;
pub mod processing;
pub mod scheduler;
pub mod server;

// Re-export commonly used types for convenience
pub use scheduler::{JobContext, JobRunner, LockRegistry, RecurringJob, SchedulerState};
pub use server::{make_app, run_server};
