use super::locks::LockRegistry;
use crate::directory::SubscriberId;
use std::sync::atomic::{AtomicBool, Ordering};

/// Identity of one of the four recurring jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobId {
    ScheduledContent,
    ImmediateCheck,
    Telegram,
    MidnightRefresh,
}

impl JobId {
    pub const ALL: [JobId; 4] = [
        JobId::ScheduledContent,
        JobId::ImmediateCheck,
        JobId::Telegram,
        JobId::MidnightRefresh,
    ];

    fn index(self) -> usize {
        match self {
            JobId::ScheduledContent => 0,
            JobId::ImmediateCheck => 1,
            JobId::Telegram => 2,
            JobId::MidnightRefresh => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobId::ScheduledContent => "scheduled_content",
            JobId::ImmediateCheck => "immediate_check",
            JobId::Telegram => "telegram",
            JobId::MidnightRefresh => "midnight_refresh",
        }
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default)]
struct JobFlags {
    running: AtomicBool,
    scheduled: AtomicBool,
}

/// Point-in-time view of a single job.
#[derive(Debug, Clone, Copy)]
pub struct JobStatus {
    pub running: bool,
    pub next_run_scheduled: bool,
}

/// Point-in-time view of the whole scheduler, as exposed over the status
/// endpoint.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub scheduled_content: JobStatus,
    pub immediate_check: JobStatus,
    pub telegram: JobStatus,
    pub midnight_refresh: JobStatus,
    pub locked_subscribers: Vec<SubscriberId>,
}

/// Shared mutable state of the scheduler: per-job flags plus the cross-job
/// lock registry.
pub struct SchedulerState {
    jobs: [JobFlags; 4],
    locks: LockRegistry,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self {
            jobs: std::array::from_fn(|_| JobFlags::default()),
            locks: LockRegistry::new(),
        }
    }

    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Flips the running flag for the job. Returns false if a cycle is
    /// already in flight, in which case the caller must not run.
    pub fn try_begin_run(&self, job: JobId) -> bool {
        self.jobs[job.index()]
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish_run(&self, job: JobId) {
        self.jobs[job.index()].running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self, job: JobId) -> bool {
        self.jobs[job.index()].running.load(Ordering::SeqCst)
    }

    pub fn set_scheduled(&self, job: JobId, scheduled: bool) {
        self.jobs[job.index()]
            .scheduled
            .store(scheduled, Ordering::SeqCst);
    }

    pub fn is_scheduled(&self, job: JobId) -> bool {
        self.jobs[job.index()].scheduled.load(Ordering::SeqCst)
    }

    pub fn job_status(&self, job: JobId) -> JobStatus {
        JobStatus {
            running: self.is_running(job),
            next_run_scheduled: self.is_scheduled(job),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            scheduled_content: self.job_status(JobId::ScheduledContent),
            immediate_check: self.job_status(JobId::ImmediateCheck),
            telegram: self.job_status(JobId::Telegram),
            midnight_refresh: self.job_status(JobId::MidnightRefresh),
            locked_subscribers: self.locks.snapshot(),
        }
    }
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self::new()
    }
}
