// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Contributions sheet: a CSV export listing pull-request links.
//!
//! Columns are matched by header name, ignoring case, spaces, and
//! punctuation. Besides the link column, the sheet may flag featured
//! repositories and declare which statuses the report shows through
//! `Status`/`Value` column pairs.

use std::fs;

use masterror::AppError;
use tracing::{debug, info, warn};

use crate::{
    config::SheetSource,
    error::{self, Error},
    featured::parse_featured_order,
    github::{PullRequestUrl, PullRequestUrlParser},
    status::StatusFilter,
};

/// Normalized headers accepted for the link column, in priority order.
const URL_HEADERS: &[&str] = &["url", "prurl", "pullrequesturl", "pullrequest", "pr", "link"];
const FEATURED_HEADER: &str = "featured";
const FEATURED_ORDER_HEADER: &str = "featuredorder";
const STATUS_HEADER: &str = "status";
const VALUE_HEADER: &str = "value";
/// Cell value enabling a featured flag.
const FEATURED_ENABLED: &str = "yes";
/// Cell value enabling a status in the allow-list.
const STATUS_ENABLED: &str = "1";

/// One contribution row of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 0-based position of the row among the sheet's data rows.
    pub index:          usize,
    /// Validated pull-request link.
    pub pull_request:   PullRequestUrl,
    /// Whether the row marks its repository as featured.
    pub featured:       bool,
    /// Declared featured priority; `None` sorts last.
    pub featured_order: Option<f64>
}

/// Parsed sheet: contribution rows and the declared status allow-list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetDocument {
    /// Valid contribution rows in sheet order.
    pub rows:             Vec<SheetRow>,
    /// `Some` when the sheet has at least one `Status` column. An empty
    /// filter still keeps every status.
    pub allowed_statuses: Option<StatusFilter>
}

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    url:            Option<usize>,
    featured:       Option<usize>,
    featured_order: Option<usize>,
    status_pairs:   Vec<(usize, Option<usize>)>
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let position = |name: &str| normalized.iter().position(|header| header == name);

        let url = URL_HEADERS.iter().find_map(|name| position(*name));
        let status_columns = normalized.iter().enumerate().filter(|(_, h)| *h == STATUS_HEADER);
        let value_columns: Vec<usize> = normalized
            .iter()
            .enumerate()
            .filter(|(_, header)| *header == VALUE_HEADER)
            .map(|(index, _)| index)
            .collect();
        let status_pairs = status_columns
            .enumerate()
            .map(|(nth, (index, _))| (index, value_columns.get(nth).copied()))
            .collect();

        Self {
            url,
            featured: position(FEATURED_HEADER),
            featured_order: position(FEATURED_ORDER_HEADER),
            status_pairs
        }
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn cell(record: &csv::StringRecord, column: Option<usize>) -> &str {
    column.and_then(|index| record.get(index)).map_or("", str::trim)
}

/// Loads and parses the sheet from a URL or a local file.
///
/// # Errors
///
/// Returns [`Error::Service`](Error::Service) when the download fails,
/// [`Error::Io`](Error::Io) when the local file cannot be read, and
/// [`Error::Sheet`](Error::Sheet) when the header row is unreadable.
pub async fn load_sheet(source: &SheetSource) -> Result<SheetDocument, Error> {
    info!("Reading contributions sheet from {source}");
    let contents = match source {
        SheetSource::Url(url) => fetch_sheet_csv(url).await?,
        SheetSource::Path(path) => {
            fs::read_to_string(path).map_err(|source| error::io_error(path, source))?
        }
    };

    parse_sheet(&contents)
}

async fn fetch_sheet_csv(url: &str) -> Result<String, AppError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| AppError::service(format!("failed to download sheet {url}: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::service(format!("sheet {url} is unavailable: {e}")))?;

    response
        .text()
        .await
        .map_err(|e| AppError::service(format!("failed to read sheet {url}: {e}")))
}

/// Parses the CSV export of the contributions sheet.
///
/// Rows without a link, with a comment link (`#…`), or with a link that is
/// not a GitHub pull-request URL are skipped with a log line naming the sheet
/// row. A malformed `FeaturedOrder` counts as unset.
///
/// # Errors
///
/// Returns [`Error::Sheet`](Error::Sheet) when the header row cannot be read.
///
/// # Example
///
/// ```
/// use oscr::parse_sheet;
///
/// let csv = "URL,Featured,FeaturedOrder,Status,Value\n\
///            https://github.com/a/b/pull/1,YES,2,OPEN,1\n\
///            https://github.com/c/d/pull/5,,,CLOSED,0\n";
/// let sheet = parse_sheet(csv)?;
/// assert_eq!(sheet.rows.len(), 2);
/// assert!(sheet.rows[0].featured);
/// assert_eq!(sheet.allowed_statuses.unwrap().iter().collect::<Vec<_>>(), vec!["OPEN"]);
/// # Ok::<(), oscr::Error>(())
/// ```
pub fn parse_sheet(contents: &str) -> Result<SheetDocument, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let columns = Columns::resolve(reader.headers()?);
    if columns.url.is_none() {
        warn!("Sheet has no URL column; every row will be skipped");
    }

    let parser = PullRequestUrlParser::new()?;
    let mut rows = Vec::new();
    let mut enabled_statuses: Vec<String> = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row_number = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                warn!("Skipping malformed row {row_number}: {error}");
                continue;
            }
        };

        let mut declares_status = false;
        for (status_column, value_column) in &columns.status_pairs {
            let status = cell(&record, Some(*status_column));
            if status.is_empty() {
                continue;
            }
            declares_status = true;
            if cell(&record, *value_column) == STATUS_ENABLED {
                enabled_statuses.push(status.to_owned());
            }
        }

        let url = cell(&record, columns.url);
        if url.is_empty() {
            if declares_status {
                debug!("Row {row_number} only carries status settings");
            } else {
                warn!("Skipping row {row_number}: missing pull request URL");
            }
            continue;
        }
        if url.starts_with('#') {
            debug!("Skipping commented row {row_number}");
            continue;
        }

        let Some(pull_request) = parser.parse(url) else {
            warn!("Skipping row {row_number}: '{url}' is not a GitHub pull request URL");
            continue;
        };

        let featured = cell(&record, columns.featured).eq_ignore_ascii_case(FEATURED_ENABLED);
        let order_cell = cell(&record, columns.featured_order);
        let featured_order = parse_featured_order(order_cell);
        if featured_order.is_none() && !order_cell.is_empty() {
            warn!("Row {row_number}: invalid FeaturedOrder '{order_cell}', treating as unset");
        }

        rows.push(SheetRow {
            index,
            pull_request,
            featured,
            featured_order
        });
    }

    let allowed_statuses =
        (!columns.status_pairs.is_empty()).then(|| StatusFilter::new(enabled_statuses));

    Ok(SheetDocument {
        rows,
        allowed_statuses
    })
}
