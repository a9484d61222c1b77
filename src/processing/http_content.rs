//! HTTP client for the content processor service.

use super::trait_def::{ContentProcessor, ProcessingError};
use crate::directory::Subscriber;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct RefreshRequest {
    force: bool,
}

/// Content processor backed by the processor service's HTTP API.
pub struct HttpContentProcessor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentProcessor {
    /// Create a new processor client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the processor service (e.g., "http://localhost:9100")
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

    /// Get the base URL of the processor service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ContentProcessor for HttpContentProcessor {
    async fn process(&self, subscriber: &Subscriber, force: bool) -> Result<(), ProcessingError> {
        let url = format!("{}/v1/subscriber/{}/refresh", self.base_url, subscriber.id);
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { force })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProcessingError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
