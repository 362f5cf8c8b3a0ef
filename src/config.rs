//! Runtime configuration for the sync engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::{Result, TributaryError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay between the end of one poll round and the start of the
    /// next, in seconds.
    pub poll_interval_secs: u64,
    /// Per-fetch HTTP timeout, in seconds.
    pub fetch_timeout_secs: u64,
    /// Maximum number of feeds fetched concurrently within a round.
    pub workers: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            fetch_timeout_secs: 10,
            workers: 10,
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| TributaryError::Config(e.to_string()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
