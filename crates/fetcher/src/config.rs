//! Configuration for fetch runs

use std::time::Duration;

/// Default root of the remote archive.
pub const DEFAULT_BASE_URL: &str = "https://lasco-www.nrl.navy.mil/lz";

/// Payloads smaller than this are assumed to be mislabeled compressed files.
pub const MIN_PAYLOAD_BYTES: u64 = 10_000;

/// Configuration shared by the downloader and dispatcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Archive root; page and file URLs are built underneath it
    pub base_url: String,
    /// Per-request network timeout; there is no whole-run timeout
    pub timeout: Duration,
    /// Number of units of work processed in parallel
    pub workers: usize,
    /// Re-download files that already exist locally
    pub overwrite: bool,
    /// Threshold for the undersized-payload retry heuristic
    pub min_payload_bytes: u64,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(5),
            workers: 8,
            overwrite: false,
            min_payload_bytes: MIN_PAYLOAD_BYTES,
            user_agent: "fetcher/0.1.0".to_string(),
        }
    }
}
