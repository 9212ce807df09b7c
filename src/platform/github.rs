use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Issue, Platform, RepoRef};
use crate::config::settings::Settings;
use crate::enforcement::capability::RevocationToken;
use crate::error::SentryError;

const USER_AGENT: &str = concat!("collab-sentry/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// GitHub REST API client.
pub struct GitHubClient {
    http: Client,
    base_url: Url,
    token: Option<SecretString>,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct IssueResponse {
    number: u64,
    html_url: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<SecretString>) -> Result<Self, SentryError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SentryError::Settings(format!("invalid API URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SentryError::Settings(format!("invalid API URL '{base_url}'")));
        }
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SentryError> {
        let token = settings
            .token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()));
        Self::new(&settings.api_url, token)
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so `/`, `?`, `#` and spaces inside a segment cannot change the route.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

/// Map non-success responses to crate errors, keeping the response body for diagnosis.
async fn check(response: Response, what: &str) -> Result<Response, SentryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(SentryError::NotFound(what.to_owned())),
        _ => Err(SentryError::Platform(format!("{what}: HTTP {status}: {body}"))),
    }
}

#[async_trait]
impl Platform for GitHubClient {
    async fn get_content(&self, owner: &str, repo: &str, path: &str) -> Result<String, SentryError> {
        let what = format!("{owner}/{repo}/{path}");
        debug!(%what, "fetching file content");

        let response = self
            .request(
                reqwest::Method::GET,
                self.endpoint(
                    ["repos", owner, repo, "contents"]
                        .into_iter()
                        .chain(path.split('/').filter(|s| !s.is_empty())),
                ),
            )
            .send()
            .await?;
        let content: ContentResponse = check(response, &what).await?.json().await?;

        match content.encoding.as_deref() {
            Some(encoding) if encoding != "base64" => {
                return Err(SentryError::Platform(format!(
                    "{what}: unsupported content encoding '{encoding}'"
                )));
            }
            _ => {}
        }

        content
            .content
            .ok_or_else(|| SentryError::Platform(format!("{what}: not a file")))
    }

    async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue, SentryError> {
        let response = self
            .request(
                reqwest::Method::POST,
                self.endpoint(["repos", repo.owner.as_str(), repo.name.as_str(), "issues"]),
            )
            .json(&CreateIssueRequest { title, body })
            .send()
            .await?;
        let issue: IssueResponse = check(response, &format!("issues of {repo}"))
            .await?
            .json()
            .await?;

        Ok(Issue {
            number: issue.number,
            url: issue.html_url,
        })
    }

    async fn remove_collaborator(
        &self,
        repo: &RepoRef,
        username: &str,
        _token: RevocationToken,
    ) -> Result<(), SentryError> {
        let response = self
            .request(
                reqwest::Method::DELETE,
                self.endpoint([
                    "repos",
                    repo.owner.as_str(),
                    repo.name.as_str(),
                    "collaborators",
                    username,
                ]),
            )
            .send()
            .await?;
        check(response, &format!("collaborator {username} of {repo}")).await?;
        Ok(())
    }
}
