//! RailRadar HTTP client.
//!
//! Fetches the combined timetable and live-tracking response for one run of
//! a train. Handles authentication, concurrency limiting, and mapping of
//! HTTP failures onto [`RailRadarError`].

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::TrainNumber;

use super::error::RailRadarError;
use super::types::{TrainStatusData, TrainStatusResponse};

/// Default base URL for the RailRadar API.
pub const DEFAULT_BASE_URL: &str = "https://railradar.in/api/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the RailRadar client.
#[derive(Debug, Clone)]
pub struct RailRadarConfig {
    /// API key, sent as `X-Api-Key`
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RailRadarConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// RailRadar API client.
#[derive(Debug, Clone)]
pub struct RailRadarClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl RailRadarClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RailRadarConfig) -> Result<Self, RailRadarError> {
        let mut headers = HeaderMap::new();

        if !config.api_key.is_empty() {
            let api_key =
                HeaderValue::from_str(&config.api_key).map_err(|_| RailRadarError::Api {
                    status: 0,
                    message: "Invalid API key format".to_string(),
                })?;
            headers.insert("X-Api-Key", api_key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// URL of the status resource for a train.
    fn status_url(&self, train: &TrainNumber) -> String {
        format!("{}/trains/{}", self.base_url, train.as_str())
    }

    /// Get timetable and live status for one run of a train.
    pub async fn get_train_status(
        &self,
        train: &TrainNumber,
        journey_date: NaiveDate,
    ) -> Result<TrainStatusData, RailRadarError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RailRadarError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.status_url(train);
        debug!(%url, %journey_date, "requesting train status");

        let response = self
            .http
            .get(&url)
            .query(&[("journeyDate", journey_date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RailRadarError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RailRadarError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the structured error envelope when the API sends one
            return Err(match serde_json::from_str::<TrainStatusResponse>(&body) {
                Ok(envelope) if envelope.error.is_some() => match envelope.into_result() {
                    Err(e) => e,
                    Ok(_) => RailRadarError::Api {
                        status: status.as_u16(),
                        message: body,
                    },
                },
                _ if status == reqwest::StatusCode::NOT_FOUND => RailRadarError::NotFound {
                    train: train.to_string(),
                },
                _ => RailRadarError::Api {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let envelope: TrainStatusResponse =
            serde_json::from_str(&body).map_err(|e| RailRadarError::json(&e, &body))?;

        envelope.into_result()
    }
}
