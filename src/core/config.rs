use std::path::PathBuf;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::core::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of per-id writer stripes
    pub lock_stripes: usize,
    /// Page size used when a search request does not name one
    pub default_page_size: usize,
    /// Upper bound for `from + size` of a single search page
    pub max_result_window: usize,
    /// Wall-clock budget applied to searches without their own timeout
    pub default_search_timeout_ms: Option<u64>,
    /// Where `SearchIndex::save_snapshot` writes when no path is given
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lock_stripes: 64,
            default_page_size: 10,
            max_result_window: 10_000,
            default_search_timeout_ms: None,
            snapshot_path: None,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn default_search_timeout(&self) -> Option<Duration> {
        self.default_search_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }
}
