use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the spreadsheet relay endpoint.
pub const SHEETS_URL_ENV: &str = "CRADLE_SHEETS_URL";

/// Tunables for the tracking queue.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Buffered events that force an immediate flush.
    pub max_queue_size: usize,
    /// Period of the background flush task.
    pub sync_interval: Duration,
    /// Consecutive failures after which the queue stops escalating.
    pub max_retries: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 10,
            sync_interval: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// Application wiring parameters.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the profile database.
    pub data_dir: PathBuf,
    /// Spreadsheet relay endpoint. Tracking uploads are dropped (with a
    /// warning) when empty.
    pub sheets_url: String,
    pub tracker: TrackerConfig,
}

impl AppConfig {
    /// Config with the relay endpoint taken from `CRADLE_SHEETS_URL`.
    pub fn from_env(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sheets_url: env::var(SHEETS_URL_ENV).unwrap_or_default(),
            tracker: TrackerConfig::default(),
        }
    }
}
