// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run configuration shared by the CLI and the library.
//!
//! The report runs without any configuration at all: the sheet is read from
//! [`DEFAULT_SHEET_SOURCE`] and written to [`DEFAULT_OUTPUT_PATH`]. The
//! default sheet is a local CSV export rather than a hosted spreadsheet; a
//! published export URL is read instead when given through `--sheet` or
//! `OSCR_SHEET`, and [`SheetSource::parse`] downloads any `http(s)` value. An
//! optional YAML document can add logo overrides for repositories whose
//! owner avatar is a poor fit, and extend the topic-to-label mapping used to
//! build tech stacks.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{self, Error},
    record::repository_owner,
};

/// Sheet read when no override is supplied: a CSV export in the working
/// directory.
pub const DEFAULT_SHEET_SOURCE: &str = "contributions.csv";
/// Destination of the rendered report when no override is supplied.
pub const DEFAULT_OUTPUT_PATH: &str = "README.md";

/// Base URL of the hosting platform.
pub(crate) const GITHUB_BASE_URL: &str = "https://github.com";

/// Built-in mapping from repository topics to tech stack labels.
const DEFAULT_TOPIC_LABELS: &[(&str, &str,)] = &[
    ("compose", "Jetpack Compose",),
    ("react", "React",),
    ("nextjs", "Next.js",),
    ("typescript", "TypeScript",),
    ("rust", "Rust",),
];

/// Optional YAML configuration for the rendered report.
///
/// # Examples
///
/// ```
/// use oscr::parse_render_config;
///
/// let yaml = r#"
/// logo_overrides:
///   Owner/Repo: https://example.org/logo.png
/// topic_labels:
///   kotlin: Kotlin
/// "#;
/// let config = parse_render_config(yaml,).expect("valid configuration",);
/// assert_eq!(config.logo_url("owner/repo"), "https://example.org/logo.png");
/// assert_eq!(config.topic_label("kotlin"), Some("Kotlin"));
/// assert_eq!(config.topic_label("rust"), Some("Rust"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize,)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig
{
    /// Logo URL per repository identifier, matched case-insensitively.
    #[serde(default, alias = "logos")]
    pub logo_overrides: BTreeMap<String, String,>,

    /// Additional topic labels; entries here win over the built-in table.
    #[serde(default, alias = "topics")]
    pub topic_labels: BTreeMap<String, String,>,
}

impl RenderConfig
{
    /// Logo displayed for `repository`.
    ///
    /// Falls back to the owner's avatar on the hosting platform when no
    /// override is configured.
    pub fn logo_url(&self, repository: &str,) -> String
    {
        let key = repository.to_lowercase();
        self.logo_overrides
            .iter()
            .find(|(name, _,)| name.to_lowercase() == key,)
            .map(|(_, url,)| url.clone(),)
            .unwrap_or_else(|| {
                format!("{GITHUB_BASE_URL}/{}.png", repository_owner(repository,))
            },)
    }

    /// Display label for a repository topic, if the topic is mapped.
    pub fn topic_label(&self, topic: &str,) -> Option<&str,>
    {
        self.topic_labels.get(topic,).map(String::as_str,).or_else(|| {
            DEFAULT_TOPIC_LABELS
                .iter()
                .find(|(name, _,)| *name == topic,)
                .map(|(_, label,)| *label,)
        },)
    }
}

/// Loads the render configuration from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`](Error::Io) when the file cannot be read and
/// [`Error::Parse`](Error::Parse) when the YAML is invalid.
pub fn load_render_config(path: &Path,) -> Result<RenderConfig, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_render_config(&contents,)
}

/// Parses the render configuration from a YAML string.
///
/// An empty document yields the default configuration.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded.
pub fn parse_render_config(contents: &str,) -> Result<RenderConfig, Error,>
{
    if contents.trim().is_empty() {
        return Ok(RenderConfig::default(),);
    }

    let config: RenderConfig = serde_yaml::from_str(contents,)?;
    Ok(config,)
}

/// Location of the contributions sheet.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum SheetSource
{
    /// CSV export downloaded over HTTP(S).
    Url(String,),
    /// CSV file on the local filesystem.
    Path(PathBuf,),
}

impl SheetSource
{
    /// Interprets `value` as a URL when it uses an HTTP scheme, otherwise as
    /// a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](Error::Validation) when `value` is blank.
    pub fn parse(value: &str,) -> Result<Self, Error,>
    {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("sheet source cannot be empty",),);
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://",) || lower.starts_with("https://",) {
            Ok(Self::Url(trimmed.to_owned(),),)
        } else {
            Ok(Self::Path(PathBuf::from(trimmed,),),)
        }
    }
}

impl fmt::Display for SheetSource
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        match self {
            Self::Url(url,) => f.write_str(url,),
            Self::Path(path,) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests
{
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use super::{
        DEFAULT_SHEET_SOURCE, RenderConfig, SheetSource, load_render_config, parse_render_config,
    };

    #[test]
    fn logo_defaults_to_owner_avatar()
    {
        let config = RenderConfig::default();
        assert_eq!(config.logo_url("rust-lang/rust"), "https://github.com/rust-lang.png");
        assert_eq!(config.logo_url("unknown/unknown"), "https://github.com/unknown.png");
    }

    #[test]
    fn logo_override_matches_case_insensitively()
    {
        let mut config = RenderConfig::default();
        config
            .logo_overrides
            .insert("JetBrains/compose-multiplatform".to_owned(), "https://logo/compose.svg".to_owned(),);

        assert_eq!(config.logo_url("jetbrains/Compose-Multiplatform"), "https://logo/compose.svg");
        assert_eq!(config.logo_url("jetbrains/kotlin"), "https://github.com/jetbrains.png");
    }

    #[test]
    fn user_topic_labels_override_builtin_table()
    {
        let config = parse_render_config("topic_labels:\n  rust: Rust 🦀\n  go: Go\n",)
            .expect("expected configuration",);

        assert_eq!(config.topic_label("rust"), Some("Rust 🦀"));
        assert_eq!(config.topic_label("go"), Some("Go"));
        assert_eq!(config.topic_label("nextjs"), Some("Next.js"));
        assert_eq!(config.topic_label("cli"), None);
    }

    #[test]
    fn empty_document_yields_defaults()
    {
        assert_eq!(parse_render_config("  \n",).unwrap(), RenderConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected()
    {
        let error = parse_render_config("colors: {}\n",).unwrap_err();
        assert!(matches!(error, crate::Error::Parse { .. }));
    }

    #[test]
    fn load_reports_missing_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let error = load_render_config(&temp.path().join("missing.yaml",),).unwrap_err();
        assert!(matches!(error, crate::Error::Io { .. }));
    }

    #[test]
    fn load_reads_yaml_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("oscr.yaml",);
        fs::write(&path, "logos:\n  a/b: https://logo/b.png\n",).expect("failed to write config",);

        let config = load_render_config(&path,).expect("expected configuration",);
        assert_eq!(config.logo_url("a/b"), "https://logo/b.png");
    }

    #[test]
    fn default_sheet_source_is_a_local_path()
    {
        assert_eq!(
            SheetSource::parse(DEFAULT_SHEET_SOURCE,).unwrap(),
            SheetSource::Path(PathBuf::from("contributions.csv")),
        );
    }

    #[test]
    fn sheet_source_detects_urls_and_paths()
    {
        assert_eq!(
            SheetSource::parse(" https://docs.example.com/export?format=csv ",).unwrap(),
            SheetSource::Url("https://docs.example.com/export?format=csv".to_owned()),
        );
        assert_eq!(
            SheetSource::parse("data/contributions.csv",).unwrap(),
            SheetSource::Path(PathBuf::from("data/contributions.csv")),
        );
        assert!(SheetSource::parse("   ",).is_err());
    }
}
