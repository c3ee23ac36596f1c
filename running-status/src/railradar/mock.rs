//! Mock RailRadar client for running without API access.
//!
//! Loads recorded response envelopes from JSON files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::TrainNumber;

use super::error::RailRadarError;
use super::types::{TrainStatusData, TrainStatusResponse};

/// Mock client that serves responses from JSON files.
#[derive(Clone)]
pub struct MockRailRadarClient {
    /// Pre-loaded response envelopes, keyed by train number.
    responses: Arc<RwLock<HashMap<TrainNumber, TrainStatusResponse>>>,
}

impl MockRailRadarClient {
    /// Create a mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{train_number}.json` (e.g. `12301.json`), each
    /// holding a full response envelope. Files with other names are skipped.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, RailRadarError> {
        let responses = load_dir(data_dir.as_ref())?;
        Ok(Self {
            responses: Arc::new(RwLock::new(responses)),
        })
    }

    /// Serve the recorded response for a train.
    ///
    /// The journey date is ignored; recordings are static.
    pub async fn get_train_status(
        &self,
        train: &TrainNumber,
        _journey_date: NaiveDate,
    ) -> Result<TrainStatusData, RailRadarError> {
        let responses = self.responses.read().await;

        let response = responses
            .get(train)
            .cloned()
            .ok_or_else(|| RailRadarError::NotFound {
                train: train.to_string(),
            })?;

        response.into_result()
    }

    /// Trains with recorded responses.
    pub async fn available_trains(&self) -> Vec<TrainNumber> {
        let responses = self.responses.read().await;
        responses.keys().copied().collect()
    }

    /// Reload recordings from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), RailRadarError> {
        let fresh = load_dir(data_dir.as_ref())?;
        *self.responses.write().await = fresh;
        Ok(())
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<TrainNumber, TrainStatusResponse>, RailRadarError> {
    let mut responses = HashMap::new();

    let entries = std::fs::read_dir(data_dir).map_err(|e| RailRadarError::MockData {
        message: format!("Failed to read mock data directory {}: {e}", data_dir.display()),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| RailRadarError::MockData {
            message: format!("Failed to read directory entry: {e}"),
        })?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let Some(train) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| TrainNumber::parse(s).ok())
        else {
            warn!(path = %path.display(), "skipping mock file not named after a train number");
            continue;
        };

        let json = std::fs::read_to_string(&path).map_err(|e| RailRadarError::MockData {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;

        let response: TrainStatusResponse =
            serde_json::from_str(&json).map_err(|e| RailRadarError::MockData {
                message: format!("Failed to parse {}: {e}", path.display()),
            })?;

        responses.insert(train, response);
    }

    if responses.is_empty() {
        return Err(RailRadarError::MockData {
            message: format!("No mock train files found in {}", data_dir.display()),
        });
    }

    Ok(responses)
}
