//! Parsing of remote HTML directory-listing pages

use scraper::{Html, Selector};

/// Substrings that mark a link target as a science data file.
const DATA_FILE_MARKERS: [&str; 2] = ["fts", "fits"];

/// Extract candidate file names from one listing page.
///
/// Only the first `<table>` on the page is consulted. The archive's listing
/// pages have historically carried a single table, and matching that
/// behavior exactly is deliberate; auxiliary tables, should they ever
/// appear, are ignored.
///
/// Returns link targets in document order. An empty result is a normal
/// outcome (a day with no data), not an error.
pub fn parse_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").expect("valid table selector");
    let link_selector = Selector::parse("td a[href]").expect("valid link selector");

    let Some(first_table) = document.select(&table_selector).next() else {
        return Vec::new();
    };

    first_table
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| DATA_FILE_MARKERS.iter().any(|marker| href.contains(marker)))
        .map(str::to_string)
        .collect()
}
