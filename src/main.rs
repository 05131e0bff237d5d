//! Command-line interface for the oscr binary.
//!
//! Without flags the binary reads `contributions.csv`, fetches every listed
//! pull request from GitHub, and writes the rendered report to `README.md`.
//! Each location can be overridden by a flag or its environment variable.

use std::{path::PathBuf, process};

use clap::Parser;
use oscr::{
    DEFAULT_OUTPUT_PATH, DEFAULT_SHEET_SOURCE, Error, GithubSource, RenderConfig, SheetSource,
    collect_contributions, load_render_config, load_sheet, render_markdown, write_readme,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Top-level CLI options parsed from user input.
#[derive(Debug, Parser,)]
#[command(name = "oscr", version, about = "Render open-source pull-request contributions as markdown")]
struct Cli
{
    /// Contributions sheet: a CSV export URL or a local CSV file.
    #[arg(long = "sheet", value_name = "URL|PATH", env = "OSCR_SHEET", default_value = DEFAULT_SHEET_SOURCE)]
    sheet: String,

    /// Destination of the rendered markdown report.
    #[arg(long = "output", value_name = "PATH", env = "OSCR_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Optional YAML file with logo overrides and topic labels.
    #[arg(long = "config", value_name = "PATH", env = "OSCR_CONFIG")]
    config: Option<PathBuf,>,

    /// GitHub token used to authenticate API requests.
    #[arg(long = "token", value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),
        )
        .init();

    if let Err(error,) = run(Cli::parse(),).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes one report generation run.
///
/// # Errors
///
/// Propagates configuration, sheet, and output failures. Failures on
/// individual pull requests are logged and do not abort the run.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let config = match cli.config.as_deref() {
        Some(path,) => load_render_config(path,)?,
        None => RenderConfig::default(),
    };

    let source = SheetSource::parse(&cli.sheet,)?;
    let sheet = load_sheet(&source,).await?;

    let github = GithubSource::new(cli.token.as_deref(), config.clone(),)?;
    let report = collect_contributions(&github, &sheet,).await;
    if report.fetch_failures > 0 || report.invalid > 0 {
        warn!(
            "{} pull requests could not be fetched and {} were malformed",
            report.fetch_failures, report.invalid
        );
    }

    let document = render_markdown(&report.contributions, &report.featured, &config,);
    if write_readme(&cli.output, &document,)? {
        info!("Report written to {}", cli.output.display());
    }

    Ok((),)
}
