use serde::Deserialize;
use time::OffsetDateTime;

use super::{send, Client, Error};
use crate::changelog::github::{parse_timestamp, Release};

impl Client {
    /// The releases of a repository as the API orders them, newest first.
    pub(crate) async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, Error> {
        let activity = || format!("listing releases of {owner}/{repo}");
        send(
            self.github_api(&format!("repos/{owner}/{repo}/releases")),
            &activity,
        )
        .await?
        .json()
        .await
        .map_err(|source| Error::ApiResponse {
            source,
            activity: activity(),
        })
    }

    /// When `path` was last touched on the default branch, `None` if it never was.
    pub(crate) async fn last_commit_date(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<OffsetDateTime>, Error> {
        let activity = || format!("looking up the last commit to {path} in {owner}/{repo}");
        let commits: Vec<CommitItem> = send(
            self.github_api(&format!("repos/{owner}/{repo}/commits"))
                .query(&[("path", path), ("per_page", "1")]),
            &activity,
        )
        .await?
        .json()
        .await
        .map_err(|source| Error::ApiResponse {
            source,
            activity: activity(),
        })?;
        Ok(commits
            .into_iter()
            .next()
            .and_then(|item| parse_timestamp(&item.commit.committer.date)))
    }
}

#[derive(Deserialize)]
struct CommitItem {
    commit: Commit,
}

#[derive(Deserialize)]
struct Commit {
    committer: Committer,
}

#[derive(Deserialize)]
struct Committer {
    date: String,
}
