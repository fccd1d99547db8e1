//! Concurrent dispatch of units of work
//!
//! One unit is either a single listing page (date-range mode) or one
//! manifest group's full file set. Units run in parallel up to the
//! configured pool width; downloads inside a unit run strictly
//! sequentially, which bounds the load placed on any one remote directory.

use crate::config::FetchConfig;
use crate::download::{DownloadOutcome, DownloadTarget, FileFetcher};
use crate::error::Result;
use crate::listing::parse_listing;
use crate::plan::{DayPage, ManifestGroup};
use crate::report::{ReportCallback, ReportEvent, RunStatus, UnitStatus};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::debug;

/// One unit of work for a single pool worker
#[derive(Debug, Clone)]
pub enum WorkUnit {
    /// Date-range mode: discover files by fetching and parsing one listing
    /// page, then download them
    Page {
        page_url: String,
        group_id: String,
        dest_dir: std::path::PathBuf,
    },
    /// Manifest mode: download one group's pre-resolved file set
    Group {
        group_id: String,
        targets: Vec<DownloadTarget>,
    },
}

impl WorkUnit {
    /// Build a page unit for one day of a date-range plan.
    pub fn page(day: &DayPage, dest_dir: &Path) -> Self {
        Self::Page {
            page_url: day.url.clone(),
            group_id: day.date_code.clone(),
            dest_dir: dest_dir.to_path_buf(),
        }
    }

    /// Build a group unit from a manifest group, resolving each relative URL
    /// against the archive root and mirroring its path under `dest_dir`.
    pub fn group(group: ManifestGroup, base_url: &str, dest_dir: &Path) -> Self {
        let targets = group
            .relative_urls
            .iter()
            .map(|relative| DownloadTarget {
                remote_url: format!("{base_url}/{relative}"),
                local_path: dest_dir.join(relative),
                group_id: group.group_id.clone(),
            })
            .collect();

        Self::Group { group_id: group.group_id, targets }
    }

    /// Identifier a unit's failure is attributed to.
    pub fn label(&self) -> &str {
        match self {
            WorkUnit::Page { page_url, .. } => page_url,
            WorkUnit::Group { group_id, .. } => group_id,
        }
    }
}

/// Runs units of work on a bounded worker pool and folds their outcomes
/// into one run-level status
pub struct Dispatcher {
    fetcher: FileFetcher,
    callback: Option<ReportCallback>,
}

impl Dispatcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { fetcher: FileFetcher::new(config), callback: None }
    }

    pub fn with_reporter(mut self, callback: ReportCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    fn emit(&self, event: ReportEvent) {
        if let Some(ref callback) = self.callback {
            callback(event);
        }
    }

    /// Run every unit to completion and aggregate their outcome lists.
    ///
    /// A unit whose listing fetch or parse fails contributes exactly one
    /// entry to `unit_errors` and never aborts its siblings; there is no
    /// whole-run timeout or cancellation. Statuses are folded in as units
    /// finish, in no particular order.
    pub async fn run(&self, units: Vec<WorkUnit>) -> RunStatus {
        let width = self.fetcher.config().workers.max(1);
        debug!(units = units.len(), width, "starting dispatch");

        let mut outcomes = stream::iter(units.into_iter().map(|unit| {
            let label = unit.label().to_string();
            async move { (label, self.process_unit(unit).await) }
        }))
        .buffer_unordered(width);

        let mut status = RunStatus::default();
        while let Some((label, outcome)) = outcomes.next().await {
            match outcome {
                Ok(unit_status) => {
                    self.emit(ReportEvent::UnitFinished {
                        unit: label,
                        written: unit_status.written.len(),
                        skipped: unit_status.skipped.len(),
                        failed: unit_status.file_errors.len(),
                    });
                    status.absorb_unit(unit_status);
                }
                Err(e) => {
                    self.emit(ReportEvent::UnitFailed {
                        unit: label.clone(),
                        error: e.to_string(),
                    });
                    status.record_unit_failure(&label, e);
                }
            }
        }

        debug!(accounted = status.total_accounted(), "dispatch complete");
        status
    }

    async fn process_unit(&self, unit: WorkUnit) -> Result<UnitStatus> {
        let targets = match unit {
            WorkUnit::Page { page_url, group_id, dest_dir } => {
                debug!(url = %page_url, "pulling listing page");
                let html = self.fetcher.get_text(&page_url).await?;
                parse_listing(&html)
                    .into_iter()
                    .map(|name| DownloadTarget {
                        remote_url: format!("{page_url}{name}"),
                        local_path: dest_dir.join(&name),
                        group_id: group_id.clone(),
                    })
                    .collect()
            }
            WorkUnit::Group { targets, .. } => targets,
        };

        // Strictly sequential inside the unit.
        let mut unit_status = UnitStatus::default();
        for target in &targets {
            let result = self.fetcher.fetch(target).await;
            let path = result.target.local_path.display().to_string();
            match result.outcome {
                DownloadOutcome::Success => self.emit(ReportEvent::FileWritten { path }),
                DownloadOutcome::Skipped => self.emit(ReportEvent::FileSkipped { path }),
                DownloadOutcome::Failed => self.emit(ReportEvent::FileFailed {
                    path,
                    error: result.message.clone(),
                }),
            }
            unit_status.record(&result);
        }

        Ok(unit_status)
    }
}
