//! The normalized changelog model that every upstream format is reduced to.

use miette::Diagnostic;
use serde::Serialize;
use time::OffsetDateTime;

pub mod github;
pub mod markdown;
pub mod release_body;
pub mod version;

/// One released version of an upstream project.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ChangelogEntry {
    /// The version with any known tag prefix stripped, see [`version::normalize`].
    pub version: String,
    /// `None` when the source format carries no reliable per-entry date.
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub released_at: Option<OffsetDateTime>,
    /// Display label of the source, only set by the cross-source aggregation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    /// Changes that don't belong to any named section.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

impl ChangelogEntry {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
            source: None,
            sections: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// A copy of this entry labelled with the source it came from.
    #[must_use]
    pub fn with_source(&self, label: &str) -> Self {
        Self {
            source: Some(label.to_string()),
            ..self.clone()
        }
    }
}

/// A named group of changes within one [`ChangelogEntry`], like "Bug Fixes".
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub changes: Vec<String>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changes: Vec::new(),
        }
    }
}

/// Pick one entry out of everything a source returned.
///
/// Without a `version` this is the first entry, which sources order newest first.
///
/// # Errors
///
/// If `entries` is empty or no entry has exactly the requested version.
pub fn select<'a>(
    entries: &'a [ChangelogEntry],
    version: Option<&str>,
) -> Result<&'a ChangelogEntry, SelectError> {
    let Some(version) = version else {
        return entries.first().ok_or(SelectError::NoEntries);
    };
    if entries.is_empty() {
        return Err(SelectError::NoEntries);
    }
    entries
        .iter()
        .find(|entry| entry.version == version)
        .ok_or_else(|| SelectError::VersionNotFound {
            version: version.to_string(),
        })
}

#[derive(Debug, Diagnostic, thiserror::Error, Eq, PartialEq)]
pub enum SelectError {
    #[error("No changelog entries found")]
    #[diagnostic(
        code(changelog::no_entries),
        help("The upstream changelog was fetched but nothing in it looked like a release.")
    )]
    NoEntries,
    #[error("Version {version} not found")]
    #[diagnostic(
        code(changelog::version_not_found),
        help("Versions must match exactly and without a `v` prefix. Use `--list` to see every available version.")
    )]
    VersionNotFound { version: String },
}
