//! HTTP client for the stats service
//!
//! Thin reqwest wrapper over the three endpoints: `/stats` (current totals),
//! `/statsHistory` (time series) and `/statsCumulative` (lifetime totals).

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ClientError;
use crate::model::{HistoryPoint, StatsSummary};

/// HTTP client wrapper for the stats service
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Service base URL without trailing slash (e.g., "http://localhost:8081")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current windowed totals from `/stats`
    pub async fn fetch_stats(&self) -> Result<StatsSummary, ClientError> {
        self.get_json("/stats").await
    }

    /// Fetch the time series from `/statsHistory`
    pub async fn fetch_history(&self) -> Result<Vec<HistoryPoint>, ClientError> {
        self.get_json("/statsHistory").await
    }

    /// Fetch lifetime totals from `/statsCumulative`
    pub async fn fetch_cumulative(&self) -> Result<StatsSummary, ClientError> {
        self.get_json("/statsCumulative").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(response.json().await?)
    }
}
