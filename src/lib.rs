//! Renders a grouped markdown report of open-source pull-request
//! contributions.
//!
//! Pull-request links are read from a spreadsheet CSV export, enriched with
//! details from the GitHub REST API, filtered by status, bucketed by creation
//! year and month, and rendered as one table per month where contributions to
//! the same repository share a row. Featured repositories are listed above the
//! tables in their declared order.
//!
//! The library exposes each stage on its own so the grouping and rendering
//! core can be driven without network access:
//!
//! ```
//! use oscr::{
//!     ContributionsByDate, FeaturedRepositories, RawPullRequest, RenderConfig, normalize_record,
//!     render_markdown,
//! };
//!
//! let raw = RawPullRequest {
//!     title:      "feat: add caching".to_owned(),
//!     url:        "https://github.com/x/y/pull/7".to_owned(),
//!     number:     7,
//!     state:      "MERGED".to_owned(),
//!     is_draft:   false,
//!     created_at: "2025-06-01T10:00:00Z".to_owned(),
//!     repository: Some("x/y".to_owned(),),
//! };
//! let mut contributions = ContributionsByDate::new();
//! contributions.insert(normalize_record(raw, 0, None,)?,);
//!
//! let report = render_markdown(&contributions, &FeaturedRepositories::new(), &RenderConfig::default(),);
//! assert!(report.contains("## 2025"));
//! assert!(report.contains("### June"));
//! # Ok::<(), oscr::Error>(())
//! ```

mod config;
mod emoji;
mod error;
mod featured;
mod github;
mod grouping;
mod pipeline;
mod readme;
mod record;
mod render;
mod sheet;
mod status;

pub use config::{
    DEFAULT_OUTPUT_PATH, DEFAULT_SHEET_SOURCE, RenderConfig, SheetSource, load_render_config,
    parse_render_config,
};
pub use emoji::{DEFAULT_GLYPH, classify_title};
pub use error::{Error, io_error, output_io_error};
pub use featured::{FeaturedRepositories, parse_featured_order};
pub use github::{
    ContributionSource, GithubSource, PullRequestUrl, PullRequestUrlParser, RepoInfoCache,
};
pub use grouping::{ContributionsByDate, MonthKey};
pub use pipeline::{ContributionReport, collect_contributions};
pub use readme::write_readme;
pub use record::{
    ContributionRecord, RawPullRequest, RepoInfo, UNKNOWN_REPOSITORY, normalize_record,
    repository_owner,
};
pub use render::render_markdown;
pub use sheet::{SheetDocument, SheetRow, load_sheet, parse_sheet};
pub use status::{Status, StatusFilter, retains_status};
