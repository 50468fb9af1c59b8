use log::trace;
use miette::Diagnostic;
use reqwest::{header, RequestBuilder, Response};

pub mod github;

const USER_AGENT: &str = "aic-changelog";
const GITHUB_API: &str = "https://api.github.com";

/// HTTP access to the upstream changelogs, cheap to clone.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    /// Sent to the GitHub API only, raw files don't need it.
    token: Option<String>,
}

impl Client {
    /// # Errors
    ///
    /// If the TLS backend can't be initialized.
    pub fn new(token: Option<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Client)?;
        Ok(Self { http, token })
    }

    /// Download a plain text file, like a raw `CHANGELOG.md`.
    pub(crate) async fn get_text(&self, url: &str) -> Result<String, Error> {
        trace!("Fetching {url}");
        let activity = || format!("downloading {url}");
        send(self.http.get(url), &activity)
            .await?
            .text()
            .await
            .map_err(|source| Error::ApiResponse {
                source,
                activity: activity(),
            })
    }

    fn github_api(&self, path: &str) -> RequestBuilder {
        let url = format!("{GITHUB_API}/{path}");
        trace!("Fetching {url}");
        let request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header(header::AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }
}

async fn send(
    request: RequestBuilder,
    activity: impl Fn() -> String,
) -> Result<Response, Error> {
    request
        .send()
        .await
        .and_then(Response::error_for_status)
        .map_err(|source| Error::ApiRequest {
            err: source.to_string(),
            activity: activity(),
        })
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error("Could not create an HTTP client: {0}")]
    #[diagnostic(
        code(integrations::client),
        help("This is probably a problem with the TLS setup of this machine.")
    )]
    Client(#[source] reqwest::Error),
    #[error("Trouble communicating with GitHub while {activity}: {err}")]
    #[diagnostic(
        code(integrations::api_request_error),
        help(
            "This may be a network issue or GitHub rate limiting unauthenticated requests. \
            Setting GITHUB_TOKEN raises the rate limit."
        )
    )]
    ApiRequest { err: String, activity: String },
    #[error("Trouble decoding the response from GitHub while {activity}: {source}")]
    #[diagnostic(
        code(integrations::api_response_error),
        help("The upstream format may have changed.")
    )]
    ApiResponse {
        source: reqwest::Error,
        activity: String,
    },
}
