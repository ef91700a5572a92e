//! HTTP client for the release API and asset downloads.

use anyhow::{Context, Result};
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::io::Write;

use super::error::ApiError;

/// Media type requested from the GitHub REST API.
pub const GITHUB_JSON: &str = "application/vnd.github+json";

/// Thin wrapper around a reqwest Client.
///
/// Requests are issued exactly once; failures are reported to the caller,
/// who decides whether to try again.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request against the GitHub API and deserializes the
    /// JSON response.
    ///
    /// A non-success status becomes an [`ApiError`] carrying the API's own
    /// error message when the body has one.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .context("Failed to send request")?;

        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Downloads a file from a URL into the writer returned by `create_writer`.
    ///
    /// The writer is only created once the server has answered with a
    /// success status. Returns the number of bytes written.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?;

        let mut response = check_status(response).await?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}

/// Turn a failure status into an [`ApiError`], passing successes through.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(status, &body).into())
}
