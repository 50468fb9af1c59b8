//! Output formats for [`ChangelogEntry`].

use std::io::{self, Write};

use miette::Diagnostic;
use serde::Serialize;

use crate::changelog::ChangelogEntry;

/// Pretty JSON (two space indent) of an entry or a list of entries, with a trailing newline.
pub fn json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Markdown in the same shape as the changelogs the entries were parsed from.
pub fn markdown(out: &mut impl Write, entry: &ChangelogEntry) -> Result<(), Error> {
    match entry.released_at {
        Some(released_at) => writeln!(out, "## {} ({})\n", entry.version, released_at.date())?,
        None => writeln!(out, "## {}\n", entry.version)?,
    }
    for section in &entry.sections {
        writeln!(out, "### {}\n", section.name)?;
        for change in &section.changes {
            writeln!(out, "- {change}")?;
        }
        writeln!(out)?;
    }
    for change in &entry.changes {
        writeln!(out, "- {change}")?;
    }
    Ok(())
}

/// Human readable text, titled with `label` (usually the source's display name).
pub fn plain_text(out: &mut impl Write, label: &str, entry: &ChangelogEntry) -> Result<(), Error> {
    match entry.released_at {
        Some(released_at) => writeln!(out, "{label} {} ({})", entry.version, released_at.date())?,
        None => writeln!(out, "{label} {}", entry.version)?,
    }
    writeln!(out, "{}", "-".repeat(40))?;

    for section in &entry.sections {
        writeln!(out, "\n[{}]", section.name)?;
        for change in &section.changes {
            writeln!(out, "  * {change}")?;
        }
    }
    if !entry.sections.is_empty() && !entry.changes.is_empty() {
        writeln!(out)?;
    }
    for change in &entry.changes {
        writeln!(out, "  * {change}")?;
    }
    Ok(())
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error("Error writing to stdout: {0}")]
    #[diagnostic(code(render::stdout))]
    Stdout(#[from] io::Error),
    #[error("Could not encode JSON: {0}")]
    #[diagnostic(
        code(render::json),
        help("This is probably a bug in aic, please report it.")
    )]
    Json(#[from] serde_json::Error),
}
