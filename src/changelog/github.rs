//! Entries built from the GitHub Releases API.

use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{release_body, version, ChangelogEntry};

/// One item of `GET /repos/{owner}/{repo}/releases`, only the fields we need.
#[derive(Clone, Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Release {
    #[must_use]
    pub fn into_entry(self) -> ChangelogEntry {
        let (sections, changes) = release_body::parse(self.body.as_deref().unwrap_or_default());
        ChangelogEntry {
            released_at: self.published_at.as_deref().and_then(parse_timestamp),
            sections,
            changes,
            ..ChangelogEntry::new(version::normalize(&self.tag_name))
        }
    }
}

/// Parse an RFC 3339 timestamp as GitHub returns them, `None` if it isn't one.
#[must_use]
pub fn parse_timestamp(timestamp: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(timestamp, &Rfc3339).ok()
}
