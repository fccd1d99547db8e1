//! URL and path planning for both discovery modes
//!
//! Mode A enumerates one listing-page URL per calendar day of a month.
//! Mode B derives relative file URLs from pre-loaded manifest rows and
//! groups them by an external key.

use crate::error::{FetchError, Result};
use chrono::{Datelike, NaiveDate, Utc};

/// Earliest year with data in the archive.
pub const FIRST_ARCHIVE_YEAR: i32 = 1996;

/// One listing page to visit in date-range mode
#[derive(Debug, Clone)]
pub struct DayPage {
    /// `YYMMDD` date code, doubles as the page's group id
    pub date_code: String,
    /// Full listing-page URL, ends with a trailing slash
    pub url: String,
}

/// One manifest row, already loaded from tabular input by the caller
#[derive(Debug, Clone)]
pub struct ManifestRow {
    pub group_id: String,
    pub telescope: String,
    pub filename: String,
    /// Date and time separated by whitespace, date as `YYYY-MM-DD`
    pub datetime: String,
}

/// All files to pull for one manifest group, in row order
#[derive(Debug, Clone)]
pub struct ManifestGroup {
    pub group_id: String,
    /// Relative URLs `<YYMMDD>/<telescope>/<filename>`, unique within the group
    pub relative_urls: Vec<String>,
}

/// `YYMMDD` code for a date, year reduced to its last two digits.
fn date_code(year: i32, month: u32, day: u32) -> String {
    format!("{:02}{:02}{:02}", year.rem_euclid(100), month, day)
}

fn check_year(year: i32) -> Result<()> {
    let max = Utc::now().year();
    if year < FIRST_ARCHIVE_YEAR || year > max {
        return Err(FetchError::YearOutOfRange { year, max });
    }
    Ok(())
}

/// Number of days in a calendar month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(FetchError::InvalidMonth(month))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(FetchError::InvalidMonth(month))?;

    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Enumerate the listing pages for one instrument-month, in ascending day
/// order: `<base>/level_1/<YYMMDD>/<instrument>/`.
///
/// The year bound is validated upstream by the CLI as well; it is re-checked
/// here so library callers cannot plan URLs the archive can never serve.
pub fn month_pages(base_url: &str, year: i32, month: u32, instrument: &str) -> Result<Vec<DayPage>> {
    url::Url::parse(base_url)?;
    check_year(year)?;
    let last_day = days_in_month(year, month)?;

    let pages = (1..=last_day)
        .map(|day| {
            let date = date_code(year, month, day);
            let url = format!("{base_url}/level_1/{date}/{instrument}/");
            DayPage { date_code: date, url }
        })
        .collect();

    Ok(pages)
}

/// Relative URL for one manifest row: `<YYMMDD>/<telescope>/<filename>`.
fn relative_url(row: &ManifestRow) -> Result<String> {
    let malformed = || FetchError::MalformedDatetime(row.datetime.clone());

    let date = row.datetime.split_whitespace().next().ok_or_else(malformed)?;
    let mut parts = date.split('-');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;
    let month: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;
    let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;

    Ok(format!(
        "{}/{}/{}",
        date_code(year, month, day),
        row.telescope.to_lowercase(),
        row.filename
    ))
}

/// Group manifest rows by their group id, preserving first-seen group order
/// and row order within each group. Repeated URLs inside a group are dropped.
pub fn plan_manifest(rows: &[ManifestRow]) -> Result<Vec<ManifestGroup>> {
    let mut groups: Vec<ManifestGroup> = Vec::new();

    for row in rows {
        let url = relative_url(row)?;
        let idx = match groups.iter().position(|g| g.group_id == row.group_id) {
            Some(idx) => idx,
            None => {
                groups.push(ManifestGroup {
                    group_id: row.group_id.clone(),
                    relative_urls: Vec::new(),
                });
                groups.len() - 1
            }
        };
        if !groups[idx].relative_urls.contains(&url) {
            groups[idx].relative_urls.push(url);
        }
    }

    Ok(groups)
}
