//! Every upstream project `aic` knows how to read, and how to read it.

use std::fmt::{self, Display};

use log::debug;
use miette::Diagnostic;
use regex::Regex;

use crate::{
    changelog::{github::Release, markdown, ChangelogEntry},
    integrations::{self, Client},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Source {
    /// What users type on the command line.
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: Kind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Notes are the bodies of GitHub releases.
    GitHubReleases {
        owner: &'static str,
        repo: &'static str,
    },
    /// Notes are one markdown file with a header per version.
    Changelog {
        owner: &'static str,
        repo: &'static str,
        path: &'static str,
        header: Header,
    },
}

/// The shape of each version header in a [`Kind::Changelog`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Header {
    /// The pattern captures only the version. The newest entry is dated with the last commit
    /// that touched the file.
    Undated(&'static str),
    /// The pattern captures the version and then a `YYYY-MM-DD` date.
    Dated(&'static str),
}

/// All known sources, in the order they're listed to users.
pub const SOURCES: &[Source] = &[
    Source {
        name: "claude",
        display_name: "Claude Code",
        kind: Kind::Changelog {
            owner: "anthropics",
            repo: "claude-code",
            path: "CHANGELOG.md",
            header: Header::Undated(r"(?m)^## (\d+\.\d+\.\d+)\s*$"),
        },
    },
    Source {
        name: "codex",
        display_name: "OpenAI Codex",
        kind: Kind::GitHubReleases {
            owner: "openai",
            repo: "codex",
        },
    },
    Source {
        name: "opencode",
        display_name: "OpenCode",
        kind: Kind::GitHubReleases {
            owner: "sst",
            repo: "opencode",
        },
    },
    Source {
        name: "gemini",
        display_name: "Gemini CLI",
        kind: Kind::GitHubReleases {
            owner: "google-gemini",
            repo: "gemini-cli",
        },
    },
    Source {
        name: "copilot",
        display_name: "GitHub Copilot CLI",
        kind: Kind::Changelog {
            owner: "github",
            repo: "copilot-cli",
            path: "changelog.md",
            header: Header::Dated(r"(?m)^## ([\d.]+) - (\d{4}-\d{2}-\d{2})\s*$"),
        },
    },
];

#[must_use]
pub fn find(name: &str) -> Option<&'static Source> {
    SOURCES.iter().find(|source| source.name == name)
}

impl Source {
    /// Download and parse every entry of this source, newest first.
    ///
    /// # Errors
    ///
    /// If the changelog can't be downloaded or decoded.
    pub async fn fetch(&self, client: &Client) -> Result<Vec<ChangelogEntry>, Error> {
        match self.kind {
            Kind::GitHubReleases { owner, repo } => Ok(client
                .list_releases(owner, repo)
                .await?
                .into_iter()
                .map(Release::into_entry)
                .collect()),
            Kind::Changelog {
                owner,
                repo,
                path,
                header,
            } => {
                let content = client.get_text(&raw_url(owner, repo, path)).await?;
                let mut entries = header.parse(&content)?;
                if let (Header::Undated(_), Some(newest)) = (header, entries.first_mut()) {
                    match client.last_commit_date(owner, repo, path).await {
                        Ok(Some(date)) => newest.released_at = Some(date),
                        Ok(None) => debug!("No commits found for {owner}/{repo}/{path}"),
                        Err(err) => debug!("Could not date {self}: {err}"),
                    }
                }
                Ok(entries)
            }
        }
    }
}

impl Header {
    fn parse(self, content: &str) -> Result<Vec<ChangelogEntry>, Error> {
        Ok(match self {
            Self::Undated(pattern) => markdown::parse_undated(content, &compile(pattern)?),
            Self::Dated(pattern) => markdown::parse_dated(content, &compile(pattern)?),
        })
    }
}

fn compile(pattern: &'static str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|source| Error::Pattern { pattern, source })
}

fn raw_url(owner: &str, repo: &str, path: &str) -> String {
    format!("https://raw.githubusercontent.com/{owner}/{repo}/main/{path}")
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name)
    }
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Integration(#[from] integrations::Error),
    #[error("Invalid version header pattern {pattern}: {source}")]
    #[diagnostic(
        code(sources::pattern),
        help("This is a bug in aic, the built-in header patterns should always compile.")
    )]
    Pattern {
        pattern: &'static str,
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = SOURCES.iter().map(|source| source.name).collect();
        assert_eq!(names.len(), SOURCES.len());
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find("codex").map(|s| s.display_name), Some("OpenAI Codex"));
        assert_eq!(find("Codex"), None);
        assert_eq!(find(""), None);
    }

    #[test]
    fn header_patterns_compile() {
        for source in SOURCES {
            if let Kind::Changelog { header, .. } = source.kind {
                assert!(header.parse("").unwrap().is_empty(), "{source}");
            }
        }
    }

    #[test]
    fn claude_changelog_shape() {
        let Some(Source {
            kind: Kind::Changelog { header, .. },
            ..
        }) = find("claude")
        else {
            panic!("claude should be a changelog source");
        };
        let content = "# Changelog\n\n## 2.0.14\n\n- Fix @-mentioning files\n- Faster startup\n\n## 2.0.13\n\n- Add /context\n";
        let entries = header.parse(content).unwrap();
        assert_eq!(
            entries
                .iter()
                .map(|entry| (entry.version.as_str(), entry.changes.len()))
                .collect::<Vec<_>>(),
            vec![("2.0.14", 2), ("2.0.13", 1)]
        );
        assert!(entries.iter().all(|entry| entry.released_at.is_none()));
    }

    #[test]
    fn copilot_changelog_shape() {
        let Some(Source {
            kind: Kind::Changelog { header, .. },
            ..
        }) = find("copilot")
        else {
            panic!("copilot should be a changelog source");
        };
        let content = "## 0.0.340 - 2025-10-09\n\n- Added a thing\n\n## 0.0.339 - 2025-10-08\n- Fixed a thing\n";
        let entries = header.parse(content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version, "0.0.340");
        assert_eq!(entries[0].released_at, Some(datetime!(2025-10-09 0:00 UTC)));
        assert_eq!(entries[1].changes, vec!["Fixed a thing"]);
    }

    #[test]
    fn raw_urls_point_at_main() {
        assert_eq!(
            raw_url("github", "copilot-cli", "changelog.md"),
            "https://raw.githubusercontent.com/github/copilot-cli/main/changelog.md"
        );
    }
}
