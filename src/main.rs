use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketpulse_server::config::{AppConfig, CliConfig, FileConfig};
use marketpulse_server::directory::{DirectoryStore, HttpDirectoryStore, NullDirectoryStore};
use marketpulse_server::processing::{
    ContentProcessor, HttpContentProcessor, NoOpContentProcessor, NoOpNotifier,
    NotificationProcessor, StalenessPolicy, TelegramNotifier,
};
use marketpulse_server::scheduler::jobs::{
    ImmediateCheckJob, MidnightRefreshJob, ScheduledContentJob, TelegramJob,
};
use marketpulse_server::scheduler::{JobContext, JobRunner, RecurringJob, SchedulerState};
use marketpulse_server::server::run_server;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML configuration file. Values there override the CLI.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on for status requests.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,

    /// URL of the subscriber directory service.
    #[clap(long)]
    pub directory_url: Option<String>,

    /// URL of the content processor service.
    #[clap(long)]
    pub processor_url: Option<String>,

    /// Timeout in seconds for requests to collaborator services.
    #[clap(long, default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// IANA timezone anchoring the midnight refresh.
    #[clap(long, default_value = "America/New_York")]
    pub reference_timezone: String,

    /// Minimum seconds between Telegram notifications to one subscriber.
    #[clap(long, default_value_t = 21600)]
    pub telegram_cooldown_secs: u64,

    /// Seconds to wait for in-flight work during shutdown.
    #[clap(long, default_value_t = 5)]
    pub shutdown_grace_secs: u64,

    /// Interval in seconds between scheduled content cycles.
    #[clap(long, default_value_t = 3600)]
    pub scheduled_content_interval_secs: u64,

    /// Interval in seconds between immediate-check cycles.
    #[clap(long, default_value_t = 300)]
    pub immediate_check_interval_secs: u64,

    /// Interval in seconds between Telegram notification passes.
    #[clap(long, default_value_t = 900)]
    pub telegram_interval_secs: u64,

    /// Content older than this many hours is refreshed by the scheduled job.
    #[clap(long, default_value_t = 24)]
    pub max_content_age_hours: u64,

    /// Preference changes within this many minutes trigger an immediate refresh.
    #[clap(long, default_value_t = 60)]
    pub immediate_window_minutes: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            directory_url: self.directory_url.clone(),
            processor_url: self.processor_url.clone(),
            request_timeout_sec: self.request_timeout_sec,
            reference_timezone: self.reference_timezone.clone(),
            telegram_cooldown_secs: self.telegram_cooldown_secs,
            shutdown_grace_secs: self.shutdown_grace_secs,
            scheduled_content_interval_secs: self.scheduled_content_interval_secs,
            immediate_check_interval_secs: self.immediate_check_interval_secs,
            telegram_interval_secs: self.telegram_interval_secs,
            max_content_age_hours: self.max_content_age_hours,
            immediate_window_minutes: self.immediate_window_minutes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let directory: Arc<dyn DirectoryStore> = match &config.directory_url {
        Some(url) => {
            info!("Using directory service at {}", url);
            Arc::new(HttpDirectoryStore::new(
                url.clone(),
                config.request_timeout_sec,
            ))
        }
        None => {
            warn!("No directory_url configured, jobs will see no subscribers");
            Arc::new(NullDirectoryStore)
        }
    };

    let (content, notifier): (Arc<dyn ContentProcessor>, Arc<dyn NotificationProcessor>) =
        match &config.processor_url {
            Some(url) => {
                info!("Using content processor at {}", url);
                (
                    Arc::new(HttpContentProcessor::new(
                        url.clone(),
                        config.request_timeout_sec,
                    )),
                    Arc::new(TelegramNotifier::new(
                        url.clone(),
                        config.request_timeout_sec,
                        config.telegram_cooldown_secs,
                    )),
                )
            }
            None => {
                warn!("No processor_url configured, refreshes and notifications are no-ops");
                (Arc::new(NoOpContentProcessor), Arc::new(NoOpNotifier))
            }
        };

    let policy = Arc::new(StalenessPolicy::from_settings(&config.policy));
    let state = Arc::new(SchedulerState::new());
    let shutdown_token = CancellationToken::new();

    let ctx = JobContext::new(
        shutdown_token.child_token(),
        directory,
        content,
        notifier,
        policy,
        state.clone(),
    );

    info!(
        "Reference timezone for the midnight refresh: {}",
        config.reference_timezone
    );
    let jobs: Vec<Arc<dyn RecurringJob>> = vec![
        Arc::new(ScheduledContentJob::from_settings(&config.jobs)),
        Arc::new(ImmediateCheckJob::from_settings(&config.jobs)),
        Arc::new(TelegramJob::from_settings(&config.jobs)),
        Arc::new(MidnightRefreshJob::new(config.reference_timezone)),
    ];
    let mut runner_handles = Vec::with_capacity(jobs.len());
    for job in jobs {
        let runner = JobRunner::new(job, ctx.clone());
        runner_handles.push(tokio::spawn(runner.run()));
    }

    let mut server_handle = tokio::spawn(run_server(
        state,
        config.port,
        shutdown_token.child_token(),
    ));

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = &mut server_handle => {
            shutdown_token.cancel();
            return result.context("Status server task failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    shutdown_token.cancel();
    let grace = Duration::from_secs(config.shutdown_grace_secs);
    for handle in runner_handles {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    let _ = tokio::time::timeout(grace, server_handle).await;
    info!("Shutdown complete");
    Ok(())
}
