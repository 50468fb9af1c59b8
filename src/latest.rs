//! Recent releases across every source at once.

use std::future::Future;

use log::{debug, warn};
use time::{Date, Duration, OffsetDateTime};
use tokio::task::JoinSet;

use crate::{
    changelog::ChangelogEntry,
    sources::{self, Source},
};

/// What one source's fetch ended up as.
pub(crate) type Outcome = (&'static Source, Result<Vec<ChangelogEntry>, sources::Error>);

/// Run `fetch` for every source in its own task, waiting for all of them to finish.
///
/// Results arrive in completion order, not in the order of `sources`. A task that panics is
/// logged and left out, the others still complete.
pub(crate) async fn fetch_all<F, Fut>(sources: &'static [Source], fetch: F) -> Vec<Outcome>
where
    F: Fn(&'static Source) -> Fut,
    Fut: Future<Output = Result<Vec<ChangelogEntry>, sources::Error>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for source in sources {
        let fetched = fetch(source);
        tasks.spawn(async move { (source, fetched.await) });
    }

    let mut outcomes = Vec::with_capacity(sources.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => warn!("A fetch task did not finish: {err}"),
        }
    }
    outcomes
}

/// A source that could not be fetched, reported but not fatal.
#[derive(Debug)]
pub(crate) struct Warning {
    pub(crate) source: &'static Source,
    pub(crate) error: sources::Error,
}

/// The newest entry of every source released after `cutoff`, newest first.
///
/// Entries without a release date can't be placed in time and are left out.
pub(crate) fn recent(
    outcomes: Vec<Outcome>,
    cutoff: OffsetDateTime,
) -> (Vec<ChangelogEntry>, Vec<Warning>) {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    for (source, outcome) in outcomes {
        match outcome {
            Ok(fetched) => {
                let Some(newest) = fetched.first() else {
                    debug!("{source} has no entries");
                    continue;
                };
                if newest.released_at.is_some_and(|at| at > cutoff) {
                    entries.push(newest.with_source(source.display_name));
                }
            }
            Err(error) => warnings.push(Warning { source, error }),
        }
    }
    entries.sort_by(|a, b| b.released_at.cmp(&a.released_at));
    (entries, warnings)
}

/// The oldest moment still considered recent, never earlier than the first representable day.
pub(crate) fn cutoff(now: OffsetDateTime, hours: u32) -> OffsetDateTime {
    now.checked_sub(Duration::hours(i64::from(hours)))
        .unwrap_or_else(|| Date::MIN.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    use super::*;
    use crate::{integrations, sources::SOURCES};

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00 UTC);

    fn dated(version: &str, released_at: OffsetDateTime) -> ChangelogEntry {
        ChangelogEntry {
            released_at: Some(released_at),
            ..ChangelogEntry::new(version)
        }
    }

    fn failure() -> sources::Error {
        sources::Error::Integration(integrations::Error::ApiRequest {
            err: "HTTP 500".to_string(),
            activity: "testing".to_string(),
        })
    }

    #[test]
    fn newest_first_and_tagged() {
        let outcomes = vec![
            (&SOURCES[0], Ok(vec![dated("2.0.0", datetime!(2025-06-01 08:00 UTC))])),
            (
                &SOURCES[1],
                Ok(vec![
                    dated("0.9.0", datetime!(2025-06-01 11:00 UTC)),
                    dated("0.8.0", datetime!(2025-05-01 11:00 UTC)),
                ]),
            ),
        ];
        let (entries, warnings) = recent(outcomes, cutoff(NOW, 24));
        assert!(warnings.is_empty());
        assert_eq!(
            entries
                .iter()
                .map(|entry| (entry.version.as_str(), entry.source.as_deref()))
                .collect::<Vec<_>>(),
            vec![
                ("0.9.0", Some(SOURCES[1].display_name)),
                ("2.0.0", Some(SOURCES[0].display_name)),
            ]
        );
    }

    #[test]
    fn only_the_newest_entry_counts() {
        let outcomes = vec![(
            &SOURCES[1],
            Ok(vec![
                dated("0.9.0", datetime!(2025-05-01 11:00 UTC)),
                dated("0.8.0", datetime!(2025-06-01 11:00 UTC)),
            ]),
        )];
        let (entries, _) = recent(outcomes, cutoff(NOW, 24));
        assert!(entries.is_empty());
    }

    #[test]
    fn old_undated_and_empty_are_skipped() {
        let outcomes = vec![
            (&SOURCES[0], Ok(vec![ChangelogEntry::new("2.0.0")])),
            (&SOURCES[1], Ok(vec![dated("0.9.0", datetime!(2025-05-31 12:00 UTC))])),
            (&SOURCES[2], Ok(Vec::new())),
        ];
        let (entries, warnings) = recent(outcomes, cutoff(NOW, 24));
        assert!(entries.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn failures_become_warnings() {
        let outcomes = vec![
            (&SOURCES[3], Err(failure())),
            (&SOURCES[4], Ok(vec![dated("0.0.340", datetime!(2025-06-01 0:00 UTC))])),
        ];
        let (entries, warnings) = recent(outcomes, cutoff(NOW, 24));
        assert_eq!(entries.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source.name, SOURCES[3].name);
    }

    #[test]
    fn window_is_configurable() {
        assert_eq!(cutoff(NOW, 24), datetime!(2025-05-31 12:00 UTC));
        assert_eq!(cutoff(NOW, 1), datetime!(2025-06-01 11:00 UTC));
        assert_eq!(cutoff(NOW, 0), NOW);
    }

    #[test]
    fn huge_window_reaches_the_beginning_of_time() {
        let beginning = Date::MIN.midnight().assume_utc();
        assert_eq!(cutoff(NOW, u32::MAX), beginning);
        let (entries, _) = recent(
            vec![(&SOURCES[0], Ok(vec![dated("1.0.0", datetime!(1970-01-01 0:00 UTC))]))],
            cutoff(NOW, u32::MAX),
        );
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn every_source_is_fetched_even_when_some_fail() {
        let outcomes = fetch_all(SOURCES, |source| async move {
            tokio::task::yield_now().await;
            if source.name == "gemini" {
                Err(failure())
            } else {
                Ok(vec![ChangelogEntry::new(source.name)])
            }
        })
        .await;

        let mut names: Vec<_> = outcomes
            .iter()
            .map(|(source, outcome)| (source.name, outcome.is_ok()))
            .collect();
        names.sort_unstable();
        let mut expected: Vec<_> = SOURCES
            .iter()
            .map(|source| (source.name, source.name != "gemini"))
            .collect();
        expected.sort_unstable();
        assert_eq!(names, expected);

        for (source, outcome) in &outcomes {
            if let Ok(entries) = outcome {
                assert_eq!(entries[0].version, source.name);
            }
        }
    }

    #[tokio::test]
    async fn a_panicking_fetch_does_not_stop_the_rest() {
        let outcomes = fetch_all(SOURCES, |source| async move {
            assert_ne!(source.name, "claude", "fetch blew up");
            Ok::<_, sources::Error>(Vec::new())
        })
        .await;
        assert_eq!(outcomes.len(), SOURCES.len() - 1);
        assert!(outcomes.iter().all(|(source, _)| source.name != "claude"));
    }

    #[tokio::test]
    async fn nothing_to_fetch() {
        let outcomes = fetch_all(&[], |_| async { Ok::<_, sources::Error>(Vec::new()) }).await;
        assert!(outcomes.is_empty());
    }
}
