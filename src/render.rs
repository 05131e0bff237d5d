// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Markdown rendering of the contributions report.
//!
//! Rendering is a single deterministic walk over the date buckets: the same
//! buckets and featured map always produce byte-identical output. Titles and
//! URLs are inserted verbatim.

use crate::{
    config::{GITHUB_BASE_URL, RenderConfig},
    emoji::classify_title,
    featured::FeaturedRepositories,
    grouping::ContributionsByDate,
    record::ContributionRecord,
    status::{CLOSED_ICON, DRAFT_ICON, MERGED_ICON, OPEN_ICON},
};

const DOCUMENT_TITLE: &str = "# OSS Contributions";
const FEATURED_HEADING: &str = "## Featured Projects";
const TABLE_HEADER: &str =
    "| Status | Project | Tech Stack | Contribution |\n| :---: | :---: | :---: | :--- |";
/// Separator between contributions sharing one table cell.
const CELL_LINE_BREAK: &str = "<br>";
const LOGO_SIZE: u32 = 40;
const FEATURED_LOGO_SIZE: u32 = 60;

/// Renders the full markdown report.
///
/// # Arguments
///
/// * `contributions` - Retained records bucketed by year and month
/// * `featured` - Featured repositories with their display priority
/// * `config` - Logo overrides used for repository images
///
/// # Example
///
/// ```
/// use oscr::{ContributionsByDate, FeaturedRepositories, RenderConfig, render_markdown};
///
/// let document = render_markdown(
///     &ContributionsByDate::new(),
///     &FeaturedRepositories::new(),
///     &RenderConfig::default(),
/// );
/// assert!(document.starts_with("# OSS Contributions"));
/// assert!(!document.contains("Featured Projects"));
/// ```
pub fn render_markdown(
    contributions: &ContributionsByDate,
    featured: &FeaturedRepositories,
    config: &RenderConfig
) -> String {
    let mut document = String::with_capacity(4096);
    document.push_str(DOCUMENT_TITLE);
    document.push_str("\n\n");

    if !featured.is_empty() {
        document.push_str(&render_featured_section(featured, config));
    }

    for year in contributions.years_descending() {
        document.push_str(&format!("## {year}\n\n"));

        for (month, records) in contributions.months_descending(year) {
            document.push_str(&format!("### {}\n\n", month.name));
            document.push_str(TABLE_HEADER);
            document.push('\n');

            for group in group_by_repository(&sort_month(records)) {
                document.push_str(&render_group_row(group, config));
                document.push('\n');
            }

            document.push('\n');
        }
    }

    document.push_str(&render_status_legend());
    document
}

fn render_featured_section(featured: &FeaturedRepositories, config: &RenderConfig) -> String {
    let logos: Vec<String> = featured
        .sorted()
        .into_iter()
        .map(|repository| render_logo(repository, config, FEATURED_LOGO_SIZE))
        .collect();

    format!("{FEATURED_HEADING}\n\n{}\n\n", logos.join(" "))
}

/// Orders a month's records so that each repository forms one contiguous run.
///
/// The first stable pass orders by sheet position (creation time breaks
/// ties), the second stable pass by lowercase repository identifier. The
/// second key dominates while the first survives inside each repository.
pub(crate) fn sort_month(records: &[ContributionRecord]) -> Vec<&ContributionRecord> {
    let mut sorted: Vec<&ContributionRecord> = records.iter().collect();
    sorted.sort_by(|left, right| {
        left.sheet_index
            .cmp(&right.sheet_index)
            .then_with(|| left.created_at.cmp(&right.created_at))
    });
    sorted.sort_by_cached_key(|record| record.repository_key());
    sorted
}

/// Splits sorted records into runs of the same repository.
///
/// Relies on [`sort_month`] having made same-repository records contiguous.
pub(crate) fn group_by_repository<'a>(
    sorted: &'a [&'a ContributionRecord]
) -> Vec<&'a [&'a ContributionRecord]> {
    let mut groups = Vec::new();
    let mut start = 0;

    for index in 1..=sorted.len() {
        let boundary = index == sorted.len()
            || sorted[index].repository_key() != sorted[start].repository_key();
        if boundary && start < index {
            groups.push(&sorted[start..index]);
            start = index;
        }
    }

    groups
}

/// Renders one table row for a repository group.
///
/// Status icon and tech stack come from the first record of the group.
fn render_group_row(group: &[&ContributionRecord], config: &RenderConfig) -> String {
    let Some(first) = group.first() else {
        return String::new();
    };

    let contributions: Vec<String> = group.iter().map(|record| render_contribution(record)).collect();

    format!(
        "| {} | {} | {} | {} |",
        first.status.icon(),
        render_logo(&first.repository, config, LOGO_SIZE),
        first.tech_stack_label(),
        contributions.join(CELL_LINE_BREAK)
    )
}

fn render_contribution(record: &ContributionRecord) -> String {
    format!(
        "[{} #{}: {}]({})",
        classify_title(&record.title),
        record.number,
        record.title,
        record.url
    )
}

fn render_logo(repository: &str, config: &RenderConfig, size: u32) -> String {
    format!(
        "<a href=\"{GITHUB_BASE_URL}/{repository}\"><img src=\"{}\" alt=\"{repository}\" width=\"{size}\" height=\"{size}\"/></a>",
        config.logo_url(repository)
    )
}

fn render_status_legend() -> String {
    format!(
        "## Status\n\n\
         - {OPEN_ICON} **Open**: The pull request is currently open and active.\n\
         - {MERGED_ICON} **Merged**: The pull request has been merged into the codebase.\n\
         - {DRAFT_ICON} **Draft**: The pull request is a work in progress and not yet ready for review.\n\
         - {CLOSED_ICON} **Closed**: The pull request was closed without being merged.\n"
    )
}
