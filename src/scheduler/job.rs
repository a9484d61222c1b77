use super::context::JobContext;
use super::state::JobId;
use crate::directory::DirectoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error that aborts a whole job cycle.
///
/// Per-subscriber processing failures are logged inside the cycle and never
/// surface here; only a failed directory query ends a cycle early.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("directory query failed: {0}")]
    Directory(#[from] DirectoryError),
}

/// A recurring job: owns its cadence and the work of one cycle.
#[async_trait]
pub trait RecurringJob: Send + Sync {
    fn id(&self) -> JobId;

    fn name(&self) -> &'static str;

    /// Delay from `now` until the next cycle should start.
    fn next_delay(&self, now: DateTime<Utc>) -> Duration;

    /// One cycle of work over the current subscriber population.
    async fn run_cycle(&self, ctx: &JobContext) -> Result<(), JobError>;
}

/// Drives one job: arm the timer, wait, run a cycle, repeat until shutdown.
pub struct JobRunner {
    job: Arc<dyn RecurringJob>,
    ctx: JobContext,
}

impl JobRunner {
    pub fn new(job: Arc<dyn RecurringJob>, ctx: JobContext) -> Self {
        Self { job, ctx }
    }

    pub async fn run(self) {
        info!("Job {} starting", self.job.name());
        loop {
            let delay = self.job.next_delay(Utc::now());
            debug!("Job {} next run in {:?}", self.job.name(), delay);
            self.ctx.state.set_scheduled(self.job.id(), true);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.ctx.cancellation_token.cancelled() => {
                    self.ctx.state.set_scheduled(self.job.id(), false);
                    break;
                }
            }
            self.ctx.state.set_scheduled(self.job.id(), false);

            self.activate().await;

            if self.ctx.is_cancelled() {
                break;
            }
        }
        info!("Job {} stopped", self.job.name());
    }

    /// Runs one cycle, guarding against overlap with a still-running
    /// previous cycle. A panicking cycle is contained here and never takes
    /// the runner down.
    pub async fn activate(&self) {
        if !self.ctx.state.try_begin_run(self.job.id()) {
            warn!(
                "Job {} previous cycle still running, skipping this activation",
                self.job.name()
            );
            return;
        }

        let started = tokio::time::Instant::now();
        let job = self.job.clone();
        let ctx = self.ctx.clone();
        let result = tokio::spawn(async move { job.run_cycle(&ctx).await }).await;

        match result {
            Ok(Ok(())) => {
                info!(
                    "Job {} cycle completed in {:?}",
                    self.job.name(),
                    started.elapsed()
                );
            }
            Ok(Err(e)) => {
                error!("Job {} cycle failed: {}", self.job.name(), e);
            }
            Err(e) => {
                error!("Job {} cycle panicked: {}", self.job.name(), e);
            }
        }

        self.ctx.state.finish_run(self.job.id());
    }
}
