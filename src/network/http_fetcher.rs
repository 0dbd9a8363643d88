use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::traits::ByteFetcher;
use crate::constants::{DEFAULT_USER_AGENT, HTTP_REQUEST_TIMEOUT_SECS};
use crate::utils::{RecipeError, Result};

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default timeout and user agent
    pub fn new() -> Result<Self> {
        Self::with_options(
            Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS),
            DEFAULT_USER_AGENT,
        )
    }

    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Bytes> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RecipeError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
