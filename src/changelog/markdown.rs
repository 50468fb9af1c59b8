//! Parsing of whole `CHANGELOG.md` files where every version is a header followed by a flat
//! list of bullets.

use regex::{Captures, Regex};
use time::{macros::format_description, Date, OffsetDateTime};

use super::ChangelogEntry;

/// Parse a changelog whose version headers carry no date.
///
/// The first capture group of `header` is the version.
#[must_use]
pub fn parse_undated(content: &str, header: &Regex) -> Vec<ChangelogEntry> {
    spans(content, header)
        .map(|(captures, span)| ChangelogEntry {
            changes: bullets(span),
            ..ChangelogEntry::new(capture(&captures, 1))
        })
        .collect()
}

/// Parse a changelog whose version headers also carry a `YYYY-MM-DD` date.
///
/// The first capture group of `header` is the version, the second is the date.
#[must_use]
pub fn parse_dated(content: &str, header: &Regex) -> Vec<ChangelogEntry> {
    spans(content, header)
        .map(|(captures, span)| ChangelogEntry {
            released_at: parse_date(capture(&captures, 2)),
            changes: bullets(span),
            ..ChangelogEntry::new(capture(&captures, 1))
        })
        .collect()
}

/// Every match of `header` along with the text between the end of that match and the start
/// of the next one (or the end of `content`).
fn spans<'a>(
    content: &'a str,
    header: &'a Regex,
) -> impl Iterator<Item = (Captures<'a>, &'a str)> + 'a {
    let mut matches = header.captures_iter(content).peekable();
    std::iter::from_fn(move || {
        let captures = matches.next()?;
        let start = captures.get(0).map_or(0, |whole| whole.end());
        let end = matches
            .peek()
            .and_then(|next| next.get(0))
            .map_or(content.len(), |next| next.start());
        let span = content.get(start..end).unwrap_or_default();
        Some((captures, span))
    })
}

fn capture<'c>(captures: &Captures<'c>, group: usize) -> &'c str {
    captures.get(group).map_or("", |group| group.as_str())
}

/// Every `- ` bullet in `span`, in order. Only the dash marker counts here.
#[must_use]
pub fn bullets(span: &str) -> Vec<String> {
    span.lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(ToString::to_string)
        .collect()
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
#[must_use]
pub fn parse_date(date: &str) -> Option<OffsetDateTime> {
    Date::parse(date, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
