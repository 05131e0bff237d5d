// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Canonical contribution records built from raw pull-request details.
//!
//! Records are constructed once during ingestion and never mutated afterwards.
//! The renderer only ever sorts borrowed views of them.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{error::Error, status::Status};

/// Repository identifier assigned to records whose repository is unknown.
pub const UNKNOWN_REPOSITORY: &str = "unknown/unknown";

/// Timestamp layout emitted by the GitHub API for `created_at`.
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Pull-request details supplied by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RawPullRequest
{
    /// Pull-request title.
    pub title:      String,
    /// Absolute link to the pull request.
    pub url:        String,
    /// Pull-request number within its repository.
    pub number:     u64,
    /// Uppercased raw state (`OPEN`, `CLOSED`, or `MERGED`).
    pub state:      String,
    /// Whether the pull request is marked as a draft.
    pub is_draft:   bool,
    /// Creation timestamp in `YYYY-MM-DDTHH:MM:SSZ` form.
    pub created_at: String,
    /// Repository identifier in `owner/name` form when resolvable.
    pub repository: Option<String,>,
}

/// Repository metadata attached to every record of that repository.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct RepoInfo
{
    /// Repository description, empty when unavailable.
    pub description: String,
    /// Ordered, de-duplicated technology labels.
    pub tech_stack:  Vec<String,>,
}

impl RepoInfo
{
    /// Tech stack rendered as a comma-separated list.
    pub fn tech_stack_label(&self,) -> String
    {
        self.tech_stack.join(", ",)
    }
}

/// One pull-request contribution ready for grouping and rendering.
#[derive(Debug, Clone, PartialEq,)]
pub struct ContributionRecord
{
    /// Pull-request title, rendered verbatim.
    pub title:       String,
    /// Absolute link to the pull request.
    pub url:         String,
    /// Pull-request number within its repository.
    pub number:      u64,
    /// Status resolved from the raw state and draft flag.
    pub status:      Status,
    /// Repository identifier with its original casing.
    pub repository:  String,
    /// UTC creation time; selects the year/month bucket.
    pub created_at:  DateTime<Utc,>,
    /// Position of the originating row in the sheet.
    pub sheet_index: usize,
    /// Repository metadata, absent when the repository is unknown.
    pub repo_info:   Option<RepoInfo,>,
}

impl ContributionRecord
{
    /// Lowercased repository identifier used for sorting and grouping.
    pub fn repository_key(&self,) -> String
    {
        self.repository.to_lowercase()
    }

    /// Repository owner: the text before the first `/`.
    pub fn owner(&self,) -> &str
    {
        repository_owner(&self.repository,)
    }

    /// Comma-joined tech stack, empty when no metadata is attached.
    pub fn tech_stack_label(&self,) -> String
    {
        self.repo_info.as_ref().map(RepoInfo::tech_stack_label,).unwrap_or_default()
    }
}

/// Returns the owner segment of an `owner/name` identifier.
pub fn repository_owner(repository: &str,) -> &str
{
    repository.split_once('/',).map_or(repository, |(owner, _,)| owner,)
}

/// Converts raw pull-request details into a canonical record.
///
/// The status is resolved from the raw state and draft flag. A missing or
/// blank repository identifier is replaced with [`UNKNOWN_REPOSITORY`].
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when `created_at` cannot
/// be parsed as a UTC timestamp.
///
/// # Examples
///
/// ```
/// use oscr::{RawPullRequest, Status, normalize_record};
///
/// let raw = RawPullRequest {
///     title:      "feat: add caching".to_owned(),
///     url:        "https://github.com/x/y/pull/7".to_owned(),
///     number:     7,
///     state:      "OPEN".to_owned(),
///     is_draft:   true,
///     created_at: "2025-06-01T10:00:00Z".to_owned(),
///     repository: Some("x/y".to_owned(),),
/// };
/// let record = normalize_record(raw, 0, None,)?;
/// assert_eq!(record.status, Status::Draft);
/// # Ok::<(), oscr::Error>(())
/// ```
pub fn normalize_record(
    raw: RawPullRequest,
    sheet_index: usize,
    repo_info: Option<RepoInfo,>,
) -> Result<ContributionRecord, Error,>
{
    let created_at = parse_created_at(&raw.created_at,)?;
    let status = Status::resolve(&raw.state, raw.is_draft,);
    let repository = raw
        .repository
        .as_deref()
        .map(str::trim,)
        .filter(|name| !name.is_empty(),)
        .unwrap_or(UNKNOWN_REPOSITORY,)
        .to_owned();

    Ok(ContributionRecord {
        title: raw.title,
        url: raw.url,
        number: raw.number,
        status,
        repository,
        created_at,
        sheet_index,
        repo_info,
    },)
}

/// Parses a GitHub creation timestamp, accepting RFC 3339 offsets as well.
fn parse_created_at(value: &str,) -> Result<DateTime<Utc,>, Error,>
{
    let trimmed = value.trim();
    if let Ok(naive,) = NaiveDateTime::parse_from_str(trimmed, CREATED_AT_FORMAT,) {
        return Ok(naive.and_utc(),);
    }

    DateTime::parse_from_rfc3339(trimmed,)
        .map(|timestamp| timestamp.with_timezone(&Utc,),)
        .map_err(|error| Error::validation(format!("invalid createdAt '{value}': {error}"),),)
}
