//! Command-line client for pulling archive data
//!
//! All input validation, manifest loading, log configuration and summary
//! rendering lives here; the `fetcher` library stays free of process-level
//! concerns.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Datelike, Utc};
use clap::Parser;
use fetcher::{
    Dispatcher, FetchConfig, IntoReportCallback, ManifestRow, RunStatus, TracingReporter, WorkUnit,
    plan,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Earliest year the archive has data for.
const FIRST_ARCHIVE_YEAR: i32 = 1996;

#[derive(Parser, Debug)]
#[command(
    name = "soho-fetch",
    about = "Client to pull SOHO coronagraph data by date range or manifest"
)]
struct Args {
    /// Directory to download data into
    location: PathBuf,

    /// Download C2 data
    #[arg(long)]
    c2: bool,

    /// Download C3 data
    #[arg(long)]
    c3: bool,

    /// Month to pull data for (MM format)
    #[arg(short, long)]
    month: Option<u32>,

    /// Year to pull data for (YYYY format)
    #[arg(short, long)]
    year: Option<i32>,

    /// Number of units of work processed in parallel
    #[arg(short = 't', long, default_value_t = 8)]
    num_threads: usize,

    /// Overwrite existing data locally with downloaded files
    #[arg(short, long)]
    overwrite: bool,

    /// Turn on debugging messages
    #[arg(short, long)]
    debug: bool,

    /// CSV manifest driving the download instead of a date range
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Manifest column holding the group key
    #[arg(long, default_value = "request_id")]
    group_column: String,

    /// Root URL of the remote archive
    #[arg(long, default_value = fetcher::DEFAULT_BASE_URL)]
    base_url: String,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check_location(location: &Path) -> Result<()> {
    if !location.is_dir() {
        bail!(
            "{} directory does not exist (or is not a directory), please fix",
            location.display()
        );
    }
    // Write probe; the temp file is removed on drop.
    tempfile::NamedTempFile::new_in(location)
        .with_context(|| format!("{} directory is not writable", location.display()))?;
    Ok(())
}

fn check_year(year: i32) -> Result<()> {
    if year < FIRST_ARCHIVE_YEAR {
        bail!("You cannot specify a year less than {FIRST_ARCHIVE_YEAR}");
    }
    let now = Utc::now().year();
    if year > now {
        bail!("You cannot specify a year greater than {now}");
    }
    Ok(())
}

/// Load manifest rows from a CSV file with named columns.
///
/// The group column is caller-specified; `telescope`, `filename` and
/// `datetime` are fixed names.
fn load_manifest(path: &Path, group_column: &str) -> Result<Vec<ManifestRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("cannot open manifest {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("manifest is missing a {name:?} column"))
    };
    let group_idx = column(group_column)?;
    let telescope_idx = column("telescope")?;
    let filename_idx = column("filename")?;
    let datetime_idx = column("datetime")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(ManifestRow {
            group_id: field(group_idx),
            telescope: field(telescope_idx),
            filename: field(filename_idx),
            datetime: field(datetime_idx),
        });
    }
    Ok(rows)
}

fn build_units(args: &Args, config: &FetchConfig) -> Result<Vec<WorkUnit>> {
    if let Some(ref manifest) = args.manifest {
        let rows = load_manifest(manifest, &args.group_column)?;
        let groups = plan::plan_manifest(&rows)?;
        info!(rows = rows.len(), groups = groups.len(), "planned manifest download");
        return Ok(groups
            .into_iter()
            .map(|group| WorkUnit::group(group, &config.base_url, &args.location))
            .collect());
    }

    let instrument = if args.c2 {
        "c2"
    } else if args.c3 {
        "c3"
    } else {
        bail!("You need to pick either the --c2 or --c3 option");
    };
    let month = args.month.context("--month is required when no manifest is given")?;
    let year = args.year.context("--year is required when no manifest is given")?;
    check_year(year)?;

    let pages = plan::month_pages(&config.base_url, year, month, instrument)?;
    info!(pages = pages.len(), instrument, year, month, "planned date-range download");
    Ok(pages.iter().map(|day| WorkUnit::page(day, &args.location)).collect())
}

fn render_summary(status: &RunStatus) {
    info!("Wrote {} files", status.written.len());
    info!("Skipped over {} files (no overwrite)", status.skipped.len());
    if !status.file_errors.is_empty() {
        error!("Errors for {} files", status.file_errors.len());
        for message in &status.file_errors {
            error!("  {message}");
        }
    }
    if !status.unit_errors.is_empty() {
        error!("Errors for {} pages/groups", status.unit_errors.len());
        for message in &status.unit_errors {
            error!("  {message}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.debug);

    check_location(&args.location)?;

    let config = FetchConfig::default()
        .with_base_url(args.base_url.trim_end_matches('/'))
        .with_workers(args.num_threads)
        .with_overwrite(args.overwrite);

    let units = build_units(&args, &config)?;
    let dispatcher = Dispatcher::new(config).with_reporter(TracingReporter.into_callback());
    let status = dispatcher.run(units).await;

    render_summary(&status);
    Ok(if status.has_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
