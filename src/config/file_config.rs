use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub directory_url: Option<String>,
    pub processor_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub reference_timezone: Option<String>,
    pub telegram_cooldown_secs: Option<u64>,
    pub shutdown_grace_secs: Option<u64>,

    // Feature configs
    pub jobs: Option<JobsConfig>,
    pub policy: Option<PolicyConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct JobsConfig {
    pub scheduled_content_interval_secs: Option<u64>,
    pub immediate_check_interval_secs: Option<u64>,
    pub telegram_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PolicyConfig {
    pub max_content_age_hours: Option<u64>,
    pub immediate_window_minutes: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
