//! HTTP fetching of target pages
//!
//! This module provides the client that downloads the page to be extracted.
//! The body is read as text whatever the content type says.

use crate::error::{Error, Result};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Default timeout for page fetches in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the page fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Deadline for the whole fetch, body included
    pub timeout: Duration,

    /// User agent sent with each request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("pagetext/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for downloading pages
#[derive(Clone)]
pub struct PageFetcher {
    /// The underlying reqwest client
    client: ReqwestClient,

    config: FetchConfig,
}

impl PageFetcher {
    /// Create a fetcher; the configured timeout applies to every fetch
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Download `url` and return its body as text
    ///
    /// Non-success statuses are errors. The fetch stops early when `cancel`
    /// fires.
    #[instrument(skip(self, cancel))]
    pub async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        let url = Url::parse(url)?;

        let request = async {
            debug!("Sending GET request to {}", url);
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            if !status.is_success() {
                error!("Fetch of {} failed with {}", url, status);
                return Err(Error::Fetch {
                    status_code: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let body = response.text().await.map_err(|e| self.transport_error(e))?;
            Ok::<String, Error>(body)
        };

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = request => result,
        }?;

        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout)
        } else {
            Error::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><p>Hi</p></body></html>")
            .expect(1)
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/page", server.url()), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(body, "<html><body><p>Hi</p></body></html>");

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_ignores_content_type() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/data")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"not\": \"html\"}")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/data", server.url()), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(body, "{\"not\": \"html\"}");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let result = fetcher()
            .fetch(&format!("{}/missing", server.url()), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(Error::Fetch { status_code: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let result = fetcher().fetch("not a url", &CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_cancelled() {
        let server = Server::new_async().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fetcher()
            .fetch(&format!("{}/slow", server.url()), &cancel)
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
