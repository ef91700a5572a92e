use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::channel::Channel;
use super::repo::GitHubRepo;
use super::types::Release;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetRelease: Send + Sync {
    /// Fetch the release published on `channel`.
    async fn get_release(&self, repo: &GitHubRepo, channel: Channel) -> Result<Release>;
    fn api_url(&self) -> &str;
}

pub struct GitHub {
    pub http_client: HttpClient,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(http_client, api_url))]
    pub fn new(http_client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http_client,
            api_url,
        }
    }

    /// URL of the release endpoint for `channel`.
    pub fn release_url(api_url: &str, repo: &GitHubRepo, channel: Channel) -> String {
        format!(
            "{}/repos/{}/{}/releases/{}",
            api_url,
            repo.owner,
            repo.repo,
            channel.release_path()
        )
    }
}

#[async_trait]
impl GetRelease for GitHub {
    #[tracing::instrument(skip(self, repo))]
    async fn get_release(&self, repo: &GitHubRepo, channel: Channel) -> Result<Release> {
        let url = GitHub::release_url(&self.api_url, repo, channel);
        debug!("Fetching {} release from {}...", channel, url);

        let release: Release = self
            .http_client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch {} release of {}", channel, repo))?;

        debug!(
            "Got release {} with {} asset(s)",
            release.tag_name,
            release.assets.len()
        );
        Ok(release)
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiError, GITHUB_JSON};
    use reqwest::Client;

    fn repo() -> GitHubRepo {
        GitHubRepo {
            owner: "test-owner".to_string(),
            repo: "test-repo".to_string(),
        }
    }

    fn github(url: &str) -> GitHub {
        GitHub::new(HttpClient::new(Client::new()), Some(url.to_string()))
    }

    const RELEASE_BODY: &str = r#"{
        "tag_name": "v1.37.4",
        "updated_at": "2025-02-28T09:10:11Z",
        "html_url": "https://github.com/test-owner/test-repo/releases/tag/v1.37.4",
        "assets": [
            {
                "name": "imhex-1.37.4-Windows-x86_64.msi",
                "size": 25480000,
                "browser_download_url": "https://example.com/imhex-1.37.4-Windows-x86_64.msi"
            }
        ]
    }"#;

    #[test]
    fn test_default_api_url() {
        let github = GitHub::new(HttpClient::new(Client::new()), None);
        assert_eq!(github.api_url(), "https://api.github.com");

        let github = GitHub::new(
            HttpClient::new(Client::new()),
            Some("https://ghe.example.com/api/v3/".into()),
        );
        assert_eq!(github.api_url(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_release_url() {
        assert_eq!(
            GitHub::release_url("https://api.github.com", &repo(), Channel::Stable),
            "https://api.github.com/repos/test-owner/test-repo/releases/latest"
        );
        assert_eq!(
            GitHub::release_url("https://api.github.com", &repo(), Channel::Nightly),
            "https://api.github.com/repos/test-owner/test-repo/releases/tags/nightly"
        );
    }

    #[tokio::test]
    async fn test_get_stable_release() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/latest")
            .match_header("accept", GITHUB_JSON)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(RELEASE_BODY)
            .create_async()
            .await;

        let release = github(&server.url())
            .get_release(&repo(), Channel::Stable)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.tag_name, "v1.37.4");
        assert_eq!(release.updated_at, "2025-02-28T09:10:11Z");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].size, 25480000);
    }

    #[tokio::test]
    async fn test_get_nightly_release() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/tags/nightly")
            .with_status(200)
            .with_body(
                r#"{"tag_name": "nightly", "updated_at": "2025-03-01T00:00:00Z", "html_url": "u", "assets": []}"#,
            )
            .create_async()
            .await;

        let release = github(&server.url())
            .get_release(&repo(), Channel::Nightly)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.tag_name, "nightly");
    }

    #[tokio::test]
    async fn test_get_release_not_found() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/tags/nightly")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let err = github(&server.url())
            .get_release(&repo(), Channel::Nightly)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.downcast_ref::<ApiError>().unwrap().status, 404);
        assert_eq!(
            format!("{:#}", err),
            "Failed to fetch nightly release of test-owner/test-repo: Not Found"
        );
    }
}
