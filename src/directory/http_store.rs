//! HTTP client for the external subscriber directory service.

use super::models::{Subscriber, SubscriberFilter};
use super::trait_def::{DirectoryError, DirectoryStore};
use async_trait::async_trait;
use std::time::Duration;

/// Directory store backed by the directory service's HTTP API.
pub struct HttpDirectoryStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryStore {
    /// Create a new directory client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the directory service (e.g., "http://localhost:9000")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    /// Get the base URL of the directory service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DirectoryStore for HttpDirectoryStore {
    async fn select_subscribers(
        &self,
        filter: SubscriberFilter,
    ) -> Result<Vec<Subscriber>, DirectoryError> {
        let url = format!("{}/v1/subscribers/select", self.base_url);
        let response = self.client.post(&url).json(&filter).send().await?;

        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}
