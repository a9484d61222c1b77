mod file_config;

pub use file_config::{FileConfig, JobsConfig, PolicyConfig};

use anyhow::{bail, Result};
use chrono_tz::Tz;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub directory_url: Option<String>,
    pub processor_url: Option<String>,
    pub request_timeout_sec: u64,
    pub reference_timezone: String,
    pub telegram_cooldown_secs: u64,
    pub shutdown_grace_secs: u64,
    pub scheduled_content_interval_secs: u64,
    pub immediate_check_interval_secs: u64,
    pub telegram_interval_secs: u64,
    pub max_content_age_hours: u64,
    pub immediate_window_minutes: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            directory_url: None,
            processor_url: None,
            request_timeout_sec: 30,
            reference_timezone: "America/New_York".to_string(),
            telegram_cooldown_secs: 21600,
            shutdown_grace_secs: 5,
            scheduled_content_interval_secs: 3600,
            immediate_check_interval_secs: 300,
            telegram_interval_secs: 900,
            max_content_age_hours: 24,
            immediate_window_minutes: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub directory_url: Option<String>,
    pub processor_url: Option<String>,
    pub request_timeout_sec: u64,
    pub reference_timezone: Tz,
    pub telegram_cooldown_secs: u64,
    pub shutdown_grace_secs: u64,

    // Feature configs (with defaults)
    pub jobs: JobsSettings,
    pub policy: PolicySettings,
}

#[derive(Debug, Clone)]
pub struct JobsSettings {
    pub scheduled_content_interval_secs: u64,
    pub immediate_check_interval_secs: u64,
    pub telegram_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct PolicySettings {
    pub max_content_age_hours: u64,
    pub immediate_window_minutes: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let port = file.port.unwrap_or(cli.port);
        let directory_url = file.directory_url.or_else(|| cli.directory_url.clone());
        let processor_url = file.processor_url.or_else(|| cli.processor_url.clone());
        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        let telegram_cooldown_secs = file
            .telegram_cooldown_secs
            .unwrap_or(cli.telegram_cooldown_secs);
        let shutdown_grace_secs = file.shutdown_grace_secs.unwrap_or(cli.shutdown_grace_secs);

        let tz_name = file
            .reference_timezone
            .unwrap_or_else(|| cli.reference_timezone.clone());
        let reference_timezone = match tz_name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => bail!("Unknown reference timezone: {}", tz_name),
        };

        let jobs_file = file.jobs.unwrap_or_default();
        let jobs = JobsSettings {
            scheduled_content_interval_secs: jobs_file
                .scheduled_content_interval_secs
                .unwrap_or(cli.scheduled_content_interval_secs),
            immediate_check_interval_secs: jobs_file
                .immediate_check_interval_secs
                .unwrap_or(cli.immediate_check_interval_secs),
            telegram_interval_secs: jobs_file
                .telegram_interval_secs
                .unwrap_or(cli.telegram_interval_secs),
        };
        if jobs.scheduled_content_interval_secs == 0
            || jobs.immediate_check_interval_secs == 0
            || jobs.telegram_interval_secs == 0
        {
            bail!("Job intervals must be greater than zero");
        }

        let policy_file = file.policy.unwrap_or_default();
        let policy = PolicySettings {
            max_content_age_hours: policy_file
                .max_content_age_hours
                .unwrap_or(cli.max_content_age_hours),
            immediate_window_minutes: policy_file
                .immediate_window_minutes
                .unwrap_or(cli.immediate_window_minutes),
        };

        Ok(Self {
            port,
            directory_url,
            processor_url,
            request_timeout_sec,
            reference_timezone,
            telegram_cooldown_secs,
            shutdown_grace_secs,
            jobs,
            policy,
        })
    }
}
