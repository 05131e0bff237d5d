// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! GitHub lookups for pull-request details and repository metadata.
//!
//! [`GithubSource`] talks to the REST API through octocrab. Lookups go
//! through the [`ContributionSource`] trait so the ingestion pipeline can be
//! driven by any other source, and repository metadata is memoized per run in
//! a [`RepoInfoCache`].
use std::collections::HashMap;

use masterror::AppError;
use octocrab::Octocrab;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::RenderConfig,
    record::{RawPullRequest, RepoInfo},
};

/// Shape of a pull-request link: `https://github.com/<owner>/<repo>/pull/<n>`.
const PULL_REQUEST_URL_PATTERN: &str =
    r"^https?://(?:www\.)?github\.com/([^/\s]+)/([^/\s]+)/pull/(\d+)(?:[/?#]\S*)?$";

/// Pull-request link split into its components.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct PullRequestUrl
{
    /// Link as written in the sheet, trimmed.
    pub url:        String,
    /// Account owning the repository.
    pub owner:      String,
    /// Repository name without the owner.
    pub repository: String,
    /// Pull-request number, always positive.
    pub number:     u64,
}

impl PullRequestUrl
{
    /// Repository identifier in `owner/name` form.
    pub fn name_with_owner(&self,) -> String
    {
        format!("{}/{}", self.owner, self.repository)
    }
}

impl std::fmt::Display for PullRequestUrl
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.write_str(&self.url,)
    }
}

/// Validates pull-request links against the expected GitHub shape.
#[derive(Debug, Clone,)]
pub struct PullRequestUrlParser
{
    pattern: Regex,
}

impl PullRequestUrlParser
{
    /// Compiles the link pattern.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the pattern fails to compile.
    pub fn new() -> Result<Self, AppError,>
    {
        let pattern = Regex::new(PULL_REQUEST_URL_PATTERN,)
            .map_err(|e| AppError::validation(format!("invalid regex: {e}"),),)?;
        Ok(Self {
            pattern,
        },)
    }

    /// Parses a link, returning `None` when it is not a GitHub pull-request
    /// URL.
    ///
    /// # Example
    ///
    /// ```
    /// use oscr::PullRequestUrlParser;
    ///
    /// # fn example() -> Result<(), masterror::AppError> {
    /// let parser = PullRequestUrlParser::new()?;
    /// let url = parser.parse("https://github.com/rust-lang/rust/pull/1",).expect("valid url",);
    /// assert_eq!(url.name_with_owner(), "rust-lang/rust");
    /// assert!(parser.parse("https://gitlab.com/a/b/-/merge_requests/1",).is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(&self, raw: &str,) -> Option<PullRequestUrl,>
    {
        let trimmed = raw.trim();
        let captures = self.pattern.captures(trimmed,)?;
        let number = captures.get(3,)?.as_str().parse::<u64,>().ok().filter(|n| *n > 0,)?;

        Some(PullRequestUrl {
            url: trimmed.to_owned(),
            owner: captures.get(1,)?.as_str().to_owned(),
            repository: captures.get(2,)?.as_str().to_owned(),
            number,
        },)
    }
}

/// Source of pull-request details and repository metadata.
///
/// Calls are awaited one at a time by the pipeline; implementations do not
/// need to be concurrency-safe.
#[allow(async_fn_in_trait)]
pub trait ContributionSource
{
    /// Fetches the details of one pull request.
    async fn pull_request(&self, url: &PullRequestUrl,) -> Result<RawPullRequest, AppError,>;

    /// Fetches description and tech stack of a repository.
    async fn repository_info(&self, name_with_owner: &str,) -> Result<RepoInfo, AppError,>;
}

/// [`ContributionSource`] backed by the GitHub REST API.
#[derive(Debug, Clone,)]
pub struct GithubSource
{
    client: Octocrab,
    config: RenderConfig,
}

impl GithubSource
{
    /// Builds a client, authenticated when `token` is provided.
    ///
    /// `config` supplies the topic-to-label mapping used for tech stacks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the HTTP client cannot be initialized.
    pub fn new(token: Option<&str,>, config: RenderConfig,) -> Result<Self, AppError,>
    {
        let builder = Octocrab::builder();
        let builder = match token.map(str::trim,).filter(|value| !value.is_empty(),) {
            Some(token,) => builder.personal_token(token.to_owned(),),
            None => builder,
        };
        let client = builder.build().map_err(|e| {
            AppError::service(format!("failed to initialize GitHub client: {e}"),)
        },)?;

        Ok(Self {
            client,
            config,
        },)
    }
}

impl ContributionSource for GithubSource
{
    async fn pull_request(&self, url: &PullRequestUrl,) -> Result<RawPullRequest, AppError,>
    {
        debug!("Fetching pull request {}#{}", url.name_with_owner(), url.number);
        let payload: PullRequestPayload = self
            .client
            .get(
                format!("/repos/{}/{}/pulls/{}", url.owner, url.repository, url.number),
                None::<&(),>,
            )
            .await
            .map_err(|e| AppError::service(format!("failed to fetch {url}: {e}"),),)?;

        Ok(pull_request_from_payload(payload, url,),)
    }

    async fn repository_info(&self, name_with_owner: &str,) -> Result<RepoInfo, AppError,>
    {
        debug!("Fetching repository metadata for {}", name_with_owner);
        let payload: RepositoryPayload = self
            .client
            .get(format!("/repos/{name_with_owner}"), None::<&(),>,)
            .await
            .map_err(|e| {
                AppError::service(format!("failed to fetch repo info for {name_with_owner}: {e}"),)
            },)?;

        Ok(repo_info_from_payload(payload, &self.config,),)
    }
}

/// Per-run memoization of repository metadata keyed by `owner/name`.
///
/// Successful lookups are stored and never evicted. Failed lookups are logged,
/// yield empty metadata, and are retried on the next request.
#[derive(Debug, Clone, Default,)]
pub struct RepoInfoCache
{
    entries: HashMap<String, RepoInfo,>,
}

impl RepoInfoCache
{
    /// Creates an empty cache.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Returns cached metadata or fetches it from `source`.
    pub async fn get_or_fetch<S,>(&mut self, source: &S, name_with_owner: &str,) -> RepoInfo
    where
        S: ContributionSource,
    {
        if let Some(info,) = self.entries.get(name_with_owner,) {
            return info.clone();
        }

        match source.repository_info(name_with_owner,).await {
            Ok(info,) => {
                self.entries.insert(name_with_owner.to_owned(), info.clone(),);
                info
            }
            Err(error,) => {
                warn!("Error fetching repo info for {}: {}", name_with_owner, error);
                RepoInfo::default()
            }
        }
    }

    /// Number of memoized repositories.
    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    /// Returns `true` when nothing has been memoized yet.
    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }
}

/// Subset of `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize,)]
pub(crate) struct PullRequestPayload
{
    title:      String,
    html_url:   String,
    number:     u64,
    state:      String,
    #[serde(default)]
    draft:      Option<bool,>,
    #[serde(default)]
    merged_at:  Option<String,>,
    created_at: String,
    #[serde(default)]
    base:       Option<BranchPayload,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub(crate) struct BranchPayload
{
    #[serde(default)]
    repo: Option<RepositoryReference,>,
}

#[derive(Debug, Clone, Deserialize,)]
pub(crate) struct RepositoryReference
{
    full_name: String,
}

/// Subset of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize,)]
pub(crate) struct RepositoryPayload
{
    #[serde(default)]
    description: Option<String,>,
    #[serde(default)]
    language:    Option<String,>,
    #[serde(default)]
    topics:      Vec<String,>,
}

/// Maps the REST payload to the raw record contract.
///
/// A set `merged_at` reports `MERGED`; otherwise the REST state is
/// uppercased. The repository comes from the base branch and falls back to
/// the link.
pub(crate) fn pull_request_from_payload(
    payload: PullRequestPayload,
    url: &PullRequestUrl,
) -> RawPullRequest
{
    let state = if payload.merged_at.as_deref().is_some_and(|value| !value.is_empty(),) {
        "MERGED".to_owned()
    } else {
        payload.state.to_uppercase()
    };

    let repository = payload
        .base
        .and_then(|base| base.repo,)
        .map(|repo| repo.full_name,)
        .filter(|name| !name.trim().is_empty(),)
        .unwrap_or_else(|| url.name_with_owner(),);

    RawPullRequest {
        title: payload.title,
        url: payload.html_url,
        number: payload.number,
        state,
        is_draft: payload.draft.unwrap_or(false,),
        created_at: payload.created_at,
        repository: Some(repository,),
    }
}

/// Builds repository metadata: primary language first, then mapped topics in
/// API order, without duplicates. Unmapped topics are ignored.
pub(crate) fn repo_info_from_payload(payload: RepositoryPayload, config: &RenderConfig,) -> RepoInfo
{
    let mut tech_stack: Vec<String,> = Vec::with_capacity(payload.topics.len() + 1,);
    if let Some(language,) = payload.language.filter(|value| !value.trim().is_empty(),) {
        tech_stack.push(language,);
    }

    for topic in &payload.topics {
        if let Some(label,) = config.topic_label(topic,)
            && !tech_stack.iter().any(|existing| existing == label,)
        {
            tech_stack.push(label.to_owned(),);
        }
    }

    RepoInfo {
        description: payload.description.unwrap_or_default(),
        tech_stack,
    }
}

#[cfg(test)]
mod tests
{
    use std::sync::atomic::{AtomicUsize, Ordering};

    use masterror::AppError;

    use super::{
        ContributionSource, PullRequestPayload, PullRequestUrl, PullRequestUrlParser,
        RepoInfoCache, RepositoryPayload, pull_request_from_payload, repo_info_from_payload,
    };
    use crate::{
        config::RenderConfig,
        record::{RawPullRequest, RepoInfo},
    };

    fn url() -> PullRequestUrl
    {
        PullRequestUrlParser::new()
            .expect("pattern compiles",)
            .parse("https://github.com/Owner/Repo/pull/42",)
            .expect("valid url",)
    }

    fn pull_payload(json: &str,) -> PullRequestPayload
    {
        serde_json::from_str(json,).expect("valid payload",)
    }

    #[test]
    fn parser_accepts_pull_request_links()
    {
        let parser = PullRequestUrlParser::new().unwrap();
        let parsed = parser.parse("  https://github.com/rust-lang/cargo/pull/123/files  ",).unwrap();

        assert_eq!(parsed.owner, "rust-lang");
        assert_eq!(parsed.repository, "cargo");
        assert_eq!(parsed.number, 123);
        assert_eq!(parsed.url, "https://github.com/rust-lang/cargo/pull/123/files");
        assert!(parser.parse("http://www.github.com/a/b/pull/9?tab=commits",).is_some());
    }

    #[test]
    fn parser_rejects_other_shapes()
    {
        let parser = PullRequestUrlParser::new().unwrap();
        assert!(parser.parse("https://github.com/a/b/issues/1",).is_none());
        assert!(parser.parse("https://github.com/a/b/pull/",).is_none());
        assert!(parser.parse("https://github.com/a/b/pull/0",).is_none());
        assert!(parser.parse("https://example.com/a/b/pull/1",).is_none());
        assert!(parser.parse("not a url",).is_none());
    }

    #[test]
    fn merged_at_reports_merged_state()
    {
        let payload = pull_payload(
            r#"{"title":"feat: x","html_url":"https://github.com/Owner/Repo/pull/42","number":42,
                "state":"closed","draft":false,"merged_at":"2025-06-02T00:00:00Z",
                "created_at":"2025-06-01T10:00:00Z","base":{"repo":{"full_name":"Owner/Repo"}}}"#,
        );

        let raw = pull_request_from_payload(payload, &url(),);
        assert_eq!(raw.state, "MERGED");
        assert!(!raw.is_draft);
        assert_eq!(raw.repository.as_deref(), Some("Owner/Repo"));
        assert_eq!(raw.created_at, "2025-06-01T10:00:00Z");
    }

    #[test]
    fn open_draft_keeps_state_and_flag()
    {
        let payload = pull_payload(
            r#"{"title":"wip","html_url":"https://github.com/Owner/Repo/pull/42","number":42,
                "state":"open","draft":true,"merged_at":null,"created_at":"2025-06-01T10:00:00Z"}"#,
        );

        let raw = pull_request_from_payload(payload, &url(),);
        assert_eq!(raw.state, "OPEN");
        assert!(raw.is_draft);
        assert_eq!(raw.repository.as_deref(), Some("Owner/Repo"), "falls back to link");
    }

    #[test]
    fn tech_stack_starts_with_language_and_drops_unmapped_topics()
    {
        let payload: RepositoryPayload = serde_json::from_str(
            r#"{"description":"Docs site","language":"TypeScript",
                "topics":["nextjs","typescript","documentation","react","nextjs"]}"#,
        )
        .unwrap();

        let info = repo_info_from_payload(payload, &RenderConfig::default(),);
        assert_eq!(info.description, "Docs site");
        assert_eq!(info.tech_stack, vec!["TypeScript", "Next.js", "React"]);
        assert_eq!(info.tech_stack_label(), "TypeScript, Next.js, React");
    }

    #[test]
    fn missing_metadata_yields_empty_fields()
    {
        let payload: RepositoryPayload =
            serde_json::from_str(r#"{"description":null,"language":null}"#,).unwrap();

        let info = repo_info_from_payload(payload, &RenderConfig::default(),);
        assert_eq!(info, RepoInfo::default());
    }

    struct CountingSource
    {
        calls: AtomicUsize,
        fail:  bool,
    }

    impl ContributionSource for CountingSource
    {
        async fn pull_request(&self, url: &PullRequestUrl,) -> Result<RawPullRequest, AppError,>
        {
            Err(AppError::service(format!("unused {url}"),),)
        }

        async fn repository_info(&self, _name: &str,) -> Result<RepoInfo, AppError,>
        {
            self.calls.fetch_add(1, Ordering::SeqCst,);
            if self.fail {
                return Err(AppError::service("not found",),);
            }
            Ok(RepoInfo {
                description: "cached".to_owned(), tech_stack: vec!["Rust".to_owned()],
            },)
        }
    }

    #[tokio::test]
    async fn cache_fetches_each_repository_once()
    {
        let source = CountingSource {
            calls: AtomicUsize::new(0,), fail: false,
        };
        let mut cache = RepoInfoCache::new();

        let first = cache.get_or_fetch(&source, "a/b",).await;
        let second = cache.get_or_fetch(&source, "a/b",).await;
        cache.get_or_fetch(&source, "c/d",).await;

        assert_eq!(first, second);
        assert_eq!(first.description, "cached");
        assert_eq!(source.calls.load(Ordering::SeqCst,), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn cache_does_not_memoize_failures()
    {
        let source = CountingSource {
            calls: AtomicUsize::new(0,), fail: true,
        };
        let mut cache = RepoInfoCache::new();

        assert_eq!(cache.get_or_fetch(&source, "a/b",).await, RepoInfo::default());
        assert_eq!(cache.get_or_fetch(&source, "a/b",).await, RepoInfo::default());
        assert_eq!(source.calls.load(Ordering::SeqCst,), 2);
        assert!(cache.is_empty());
    }
}
