//! `reqwest` adapter for the network tier.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use crate::domain::errors::FetchError;
use crate::domain::ports::{CacheError, CacheResult, HttpResponse, HttpTransport};

/// User agent sent with image requests.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport. `timeout` of `None` keeps the client default.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Option<Duration>) -> CacheResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CacheError::ClientError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::network(format!("Request failed: {e}")))?;

        let status = response.status().as_u16();
        debug!(url = %url, status, "Received image response");

        if status != 200 {
            return Ok(HttpResponse::new(status, Bytes::new()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(format!("Failed to read body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}
