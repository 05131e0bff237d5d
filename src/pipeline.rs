// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Sequential ingestion of sheet rows into grouped contribution records.
//!
//! Each row goes through the same steps: fetch the pull request, resolve its
//! status, drop it when the sheet's allow-list excludes that status, attach
//! repository metadata, normalize, then record featured flags and insert the
//! record into its year/month bucket. Failures on one row are logged and
//! never stop the run.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::{
    featured::FeaturedRepositories,
    github::{ContributionSource, RepoInfoCache},
    grouping::ContributionsByDate,
    record::{UNKNOWN_REPOSITORY, normalize_record},
    sheet::SheetDocument,
    status::{Status, retains_status},
};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq,)]
pub struct ContributionReport
{
    /// Retained records bucketed by creation month.
    pub contributions:  ContributionsByDate,
    /// Featured repositories with their minimum declared order.
    pub featured:       FeaturedRepositories,
    /// Rows whose pull request could not be fetched.
    pub fetch_failures: usize,
    /// Rows excluded by the status allow-list.
    pub filtered:       usize,
    /// Rows whose pull-request details could not be normalized.
    pub invalid:        usize,
}

/// Fetches and groups every row of `sheet` through `source`.
///
/// Rows are processed in sheet order, one request at a time. Repository
/// metadata is looked up once per repository for the whole run.
///
/// # Examples
///
/// ```no_run
/// use oscr::{GithubSource, RenderConfig, collect_contributions, parse_sheet};
///
/// # async fn demo() -> Result<(), oscr::Error> {
/// let sheet = parse_sheet("URL\nhttps://github.com/a/b/pull/1\n",)?;
/// let source = GithubSource::new(None, RenderConfig::default(),)?;
/// let report = collect_contributions(&source, &sheet,).await;
/// println!("{} contributions", report.contributions.len());
/// # Ok(())
/// # }
/// ```
pub async fn collect_contributions<S,>(source: &S, sheet: &SheetDocument,) -> ContributionReport
where
    S: ContributionSource,
{
    info!("Found {} URLs. Fetching details...", sheet.rows.len());
    if let Some(filter,) = sheet.allowed_statuses.as_ref().filter(|filter| !filter.is_empty(),) {
        let statuses: Vec<&str,> = filter.iter().collect();
        info!("Keeping statuses: {}", statuses.join(", ",));
    }

    let pb = ProgressBar::new(sheet.rows.len() as u64,);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.yellow} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_bar(),),
    );

    let mut report = ContributionReport::default();
    let mut cache = RepoInfoCache::new();

    for row in &sheet.rows {
        let url = &row.pull_request;
        pb.set_message(format!("Processing {url}..."),);
        info!("Processing {url}...");
        pb.inc(1,);

        let raw = match source.pull_request(url,).await {
            Ok(raw,) => raw,
            Err(error,) => {
                warn!("Error fetching PR details for {url}: {error}");
                report.fetch_failures += 1;
                continue;
            }
        };

        let status = Status::resolve(&raw.state, raw.is_draft,);
        if !retains_status(&status, sheet.allowed_statuses.as_ref(),) {
            debug!("Skipping {url}: status {status} is not allowed");
            report.filtered += 1;
            continue;
        }

        let repository = raw
            .repository
            .as_deref()
            .map(str::trim,)
            .filter(|name| !name.is_empty() && *name != UNKNOWN_REPOSITORY,)
            .map(str::to_owned,);
        let repo_info = match repository {
            Some(name,) => Some(cache.get_or_fetch(source, &name,).await,),
            None => None,
        };

        let record = match normalize_record(raw, row.index, repo_info,) {
            Ok(record,) => record,
            Err(error,) => {
                warn!("Skipping {url}: {error}");
                report.invalid += 1;
                continue;
            }
        };

        if row.featured {
            report.featured.record(&record.repository, row.featured_order,);
        }
        report.contributions.insert(record,);
    }

    pb.finish_with_message(format!(
        "Collected {} contributions from {} repositories",
        report.contributions.len(),
        cache.len()
    ),);
    info!("Done!");

    report
}
