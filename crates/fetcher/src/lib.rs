//! Archive Fetcher Library
//!
//! This library pulls dated scientific instrument files from a remote
//! archive that lays files out under per-day, per-instrument directories.
//! Files are discovered either by parsing an HTML directory-listing page
//! (date-range mode) or from pre-loaded manifest rows grouped by an
//! external key (manifest mode). Missing files are downloaded in parallel
//! across units of work, already-present files are skipped, and catalog
//! entries whose real file turns out to be compressed are recovered via a
//! single `.gz` retry.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fetcher::{Dispatcher, FetchConfig, WorkUnit, plan};
//! use std::path::Path;
//!
//! # async fn example() -> fetcher::Result<()> {
//! let config = FetchConfig::default().with_workers(8);
//!
//! // One unit of work per calendar day of March 2017.
//! let dest = Path::new("/data/lasco");
//! let units: Vec<WorkUnit> = plan::month_pages(&config.base_url, 2017, 3, "c2")?
//!     .iter()
//!     .map(|day| WorkUnit::page(day, dest))
//!     .collect();
//!
//! let status = Dispatcher::new(config).run(units).await;
//! println!(
//!     "wrote {}, skipped {}, {} file errors, {} unit errors",
//!     status.written.len(),
//!     status.skipped.len(),
//!     status.file_errors.len(),
//!     status.unit_errors.len(),
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod download;
pub mod error;
pub mod listing;
pub mod plan;
pub mod report;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_BASE_URL, FetchConfig, MIN_PAYLOAD_BYTES};
pub use dispatch::{Dispatcher, WorkUnit};
pub use download::{DownloadOutcome, DownloadResult, DownloadTarget, FileFetcher};
pub use error::{FetchError, Result};
pub use listing::parse_listing;
pub use plan::{DayPage, ManifestGroup, ManifestRow};
pub use report::{
    IntoReportCallback, NullReporter, ReportCallback, ReportEvent, RunReporter, RunStatus,
    TracingReporter, UnitStatus,
};
