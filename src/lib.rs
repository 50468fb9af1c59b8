#![doc = include_str!("../README.md")]

use std::io::{stderr, stdout, Write};

use clap::{arg, command, value_parser, Arg, ArgMatches, Command};
use miette::{Diagnostic, Result};
use time::OffsetDateTime;

use crate::{
    changelog::ChangelogEntry,
    integrations::Client,
    sources::{Source, SOURCES},
};

pub mod changelog;
pub mod integrations;
mod latest;
pub mod render;
pub mod sources;

const EXAMPLES: &str = "\
Examples:
  aic claude                    # Latest Claude Code entry
  aic codex --json              # Latest Codex entry as JSON
  aic opencode --list           # List OpenCode versions
  aic gemini --version 0.21.0   # Specific Gemini version
  aic latest                    # All releases in the last 24 hours";

/// Parse the command line and run whatever it asks for.
///
/// # Errors
///
/// If fetching or selecting an entry fails, or output can't be written.
pub async fn run() -> Result<()> {
    let matches = build_cli().get_matches();
    let client = Client::new(matches.get_one::<String>("github-token").cloned())
        .map_err(Error::from)?;

    match matches.subcommand() {
        Some(("list-sources", _)) => list_sources(&mut stdout().lock()).map_err(Error::from)?,
        Some(("latest", sub_matches)) => {
            let json = sub_matches.get_flag("json");
            let hours = sub_matches.get_one::<u32>("hours").copied().unwrap_or(24);
            show_latest(&client, json, hours).await?;
        }
        Some((name, sub_matches)) => {
            show_source(&client, source_named(name)?, sub_matches).await?;
        }
        None => {
            build_cli().print_help().map_err(Error::from)?;
        }
    }
    Ok(())
}

fn build_cli() -> Command {
    command!()
        .about("Read the changelogs of AI coding agents")
        .after_help(EXAMPLES)
        .arg_required_else_help(true)
        .allow_external_subcommands(true)
        .arg(
            arg!(--"github-token" <TOKEN> "Token for the GitHub API, raises its rate limit")
                .env("GITHUB_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .subcommands(SOURCES.iter().map(source_command))
        .subcommand(
            Command::new("latest")
                .about("Show releases from every source in the last 24 hours")
                .arg(arg!(--json "Output as JSON"))
                .arg(
                    arg!(--hours <HOURS> "How far back to look")
                        .value_parser(value_parser!(u32))
                        .default_value("24"),
                ),
        )
        .subcommand(Command::new("list-sources").about("List every known source"))
}

/// Unknown names reach here as external subcommands, so they get a proper diagnostic.
fn source_named(name: &str) -> Result<&'static Source, Error> {
    sources::find(name).ok_or_else(|| Error::UnknownSource(name.to_string()))
}

fn source_command(source: &Source) -> Command {
    Command::new(source.name)
        .about(format!("Show the changelog of {}", source.display_name))
        .arg(arg!(--json "Output as JSON").conflicts_with("md"))
        .arg(arg!(--md "Output as markdown"))
        .arg(arg!(--list "List all versions").conflicts_with("release"))
        .arg(
            Arg::new("release")
                .long("version")
                .value_name("VERSION")
                .help("Show this version instead of the newest"),
        )
}

async fn show_source(client: &Client, source: &Source, matches: &ArgMatches) -> Result<(), Error> {
    let entries = source.fetch(client).await?;
    let mut out = stdout().lock();

    if matches.get_flag("list") {
        if entries.is_empty() {
            return Err(changelog::SelectError::NoEntries.into());
        }
        for entry in &entries {
            writeln!(out, "{}", entry.version).map_err(render::Error::from)?;
        }
        return Ok(());
    }

    let entry = changelog::select(&entries, matches.get_one::<String>("release").map(String::as_str))?;
    if matches.get_flag("json") {
        render::json(&mut out, entry)?;
    } else if matches.get_flag("md") {
        render::markdown(&mut out, entry)?;
    } else {
        render::plain_text(&mut out, source.display_name, entry)?;
    }
    Ok(())
}

async fn show_latest(client: &Client, json: bool, hours: u32) -> Result<(), Error> {
    let outcomes = latest::fetch_all(SOURCES, |source| {
        let client = client.clone();
        async move { source.fetch(&client).await }
    })
    .await;
    let (entries, warnings) =
        latest::recent(outcomes, latest::cutoff(OffsetDateTime::now_utc(), hours));

    let mut err = stderr().lock();
    for warning in warnings {
        writeln!(
            err,
            "Warning: Failed to fetch {}: {}",
            warning.source, warning.error
        )
        .map_err(render::Error::from)?;
    }

    let mut out = stdout().lock();
    if entries.is_empty() {
        writeln!(out, "No releases in the last {hours} hours.").map_err(render::Error::from)?;
    } else if json {
        render::json(&mut out, &entries)?;
    } else {
        write_all_plain(&mut out, &entries)?;
    }
    Ok(())
}

fn write_all_plain(out: &mut impl Write, entries: &[ChangelogEntry]) -> Result<(), render::Error> {
    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        render::plain_text(out, entry.source.as_deref().unwrap_or_default(), entry)?;
    }
    Ok(())
}

fn list_sources(out: &mut impl Write) -> std::io::Result<()> {
    for source in SOURCES {
        writeln!(out, "  {}\t{}", source.name, source.display_name)?;
    }
    Ok(())
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("Unknown source {0}")]
    #[diagnostic(
        code(unknown_source),
        help("Run `aic list-sources` to see every available source.")
    )]
    UnknownSource(String),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Integration(#[from] integrations::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] sources::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Select(#[from] changelog::SelectError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] render::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Render(err.into())
    }
}
