use crate::error::{RepoBrowserError, Result};
use crate::models::Repository;
use crate::types::GitHubRepo;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "github-repo-browser/0.1.0";

/// Connection settings for [`GitHubClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// `None` leaves the HTTP client's own default in place.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            timeout: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base: impl Into<String>) -> Self {
        Self {
            api_base_url: base.into(),
            ..Default::default()
        }
    }
}

/// Unauthenticated client for the repository listing endpoint
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(RepoBrowserError::ApiError(format!(
                "API URL cannot hold a path: {}",
                base_url
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(GitHubClient {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/users/{username}/repos` with the username as a single
    /// percent-encoded path segment.
    pub fn repos_url(&self, username: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RepoBrowserError::ApiError(format!(
                    "base URL cannot hold a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        Ok(url)
    }

    async fn make_request(&self, url: &Url) -> Result<Response> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        let rate_limit_remaining = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok());

        match response.status() {
            status if status.is_success() => {
                if let Some(remaining) = rate_limit_remaining {
                    if remaining < 10 {
                        warn!(remaining, "GitHub rate limit is running low");
                    }
                }
                Ok(response)
            }
            StatusCode::NOT_FOUND => {
                Err(RepoBrowserError::NotFound(format!("Resource not found: {}", url)))
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                if rate_limit_remaining == Some(0) =>
            {
                let reset = response
                    .headers()
                    .get("X-RateLimit-Reset")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse::<i64>().ok())
                    .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0));

                Err(RepoBrowserError::RateLimitExceeded(match reset {
                    Some(reset) => format!("API rate limit exceeded. Reset at: {}", reset),
                    None => "API rate limit exceeded".to_string(),
                }))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(RepoBrowserError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    /// Fetch the default page of a user's public repositories, validated and
    /// in the order GitHub returned them.
    pub async fn fetch_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let url = self.repos_url(username)?;
        debug!(%url, "Fetching repositories");

        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let repos = decode_repositories(&body)?;

        debug!(username, count = repos.len(), "Fetched repositories");
        Ok(repos)
    }
}

/// Decode and validate a `/users/{username}/repos` body.
pub fn decode_repositories(body: &str) -> Result<Vec<Repository>> {
    let raw: Vec<GitHubRepo> = serde_json::from_str(body).map_err(|e| {
        RepoBrowserError::InvalidResponse(format!("unexpected repository list shape: {}", e))
    })?;

    raw.into_iter().map(Repository::try_from).collect()
}
