//! Run status aggregation and outcome reporting
//!
//! Outcome reporting is an injected collaborator rather than a module-level
//! logger, so the core stays testable without capturing global output.

use crate::download::{DownloadOutcome, DownloadResult};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Callback invoked as outcomes are produced
pub type ReportCallback = Arc<dyn Fn(ReportEvent) + Send + Sync>;

/// Events emitted while a run makes progress
#[derive(Debug, Clone)]
pub enum ReportEvent {
    FileWritten { path: String },
    FileSkipped { path: String },
    FileFailed { path: String, error: String },
    UnitFinished { unit: String, written: usize, skipped: usize, failed: usize },
    UnitFailed { unit: String, error: String },
}

/// Trait for outcome reporting with per-event methods
pub trait RunReporter: Send + Sync {
    fn on_file_written(&self, _path: &str) {}
    fn on_file_skipped(&self, _path: &str) {}
    fn on_file_failed(&self, _path: &str, _error: &str) {}
    fn on_unit_finished(&self, _unit: &str, _written: usize, _skipped: usize, _failed: usize) {}
    fn on_unit_failed(&self, _unit: &str, _error: &str) {}
}

/// Extension trait to convert a RunReporter into a ReportCallback
pub trait IntoReportCallback {
    fn into_callback(self) -> ReportCallback;
}

impl<T: RunReporter + 'static> IntoReportCallback for T {
    fn into_callback(self) -> ReportCallback {
        Arc::new(move |event| match event {
            ReportEvent::FileWritten { path } => self.on_file_written(&path),
            ReportEvent::FileSkipped { path } => self.on_file_skipped(&path),
            ReportEvent::FileFailed { path, error } => self.on_file_failed(&path, &error),
            ReportEvent::UnitFinished { unit, written, skipped, failed } => {
                self.on_unit_finished(&unit, written, skipped, failed);
            }
            ReportEvent::UnitFailed { unit, error } => self.on_unit_failed(&unit, &error),
        })
    }
}

/// Reporter that forwards everything to `tracing`
#[derive(Debug, Default)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn on_file_written(&self, path: &str) {
        debug!(path, "wrote file");
    }

    fn on_file_skipped(&self, path: &str) {
        debug!(path, "skipped existing file");
    }

    fn on_file_failed(&self, path: &str, err: &str) {
        warn!(path, error = err, "file download failed");
    }

    fn on_unit_finished(&self, unit: &str, written: usize, skipped: usize, failed: usize) {
        debug!(unit, written, skipped, failed, "unit finished");
    }

    fn on_unit_failed(&self, unit: &str, err: &str) {
        error!(unit, error = err, "unit failed");
    }
}

/// Reporter that does nothing
#[derive(Debug, Default)]
pub struct NullReporter;

impl RunReporter for NullReporter {}

/// Outcome lists for one unit of work
#[derive(Debug, Clone, Default)]
pub struct UnitStatus {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub file_errors: Vec<String>,
}

impl UnitStatus {
    /// Fold one per-file result into this unit's lists.
    pub fn record(&mut self, result: &DownloadResult) {
        match result.outcome {
            DownloadOutcome::Success => self.written.push(result.message.clone()),
            DownloadOutcome::Skipped => self.skipped.push(result.message.clone()),
            DownloadOutcome::Failed => self.file_errors.push(result.message.clone()),
        }
    }
}

/// Aggregate status for a whole run
///
/// Lists are concatenated across units as each finishes, with no
/// deduplication; completion order across units is unspecified.
#[derive(Debug, Default)]
pub struct RunStatus {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub file_errors: Vec<String>,
    pub unit_errors: Vec<String>,
}

impl RunStatus {
    pub fn absorb_unit(&mut self, unit: UnitStatus) {
        self.written.extend(unit.written);
        self.skipped.extend(unit.skipped);
        self.file_errors.extend(unit.file_errors);
    }

    pub fn record_unit_failure(&mut self, unit: &str, error: impl std::fmt::Display) {
        self.unit_errors.push(format!("{unit} generated an exception: {error}"));
    }

    /// Every target considered plus every failed unit.
    pub fn total_accounted(&self) -> usize {
        self.written.len() + self.skipped.len() + self.file_errors.len() + self.unit_errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.file_errors.is_empty() || !self.unit_errors.is_empty()
    }
}
