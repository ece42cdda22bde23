//! HTTP transport for the factories.
//!
//! Factories describe what they want as an [`ApiRequest`] and hand it to a
//! [`JsonFetcher`]. [`ReqwestFetcher`] is the network implementation; tests
//! plug in scripted fetchers instead.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

use crate::config::{HttpConfig, RetryConfig};
use crate::errors::{ChatBotError, Result};

/// A GET request against a JSON API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Endpoint URL without query string.
    pub url: String,
    /// Query parameters, in order. Values are percent-encoded on send.
    pub params: Vec<(String, String)>,
    /// Identifier used to correlate log lines.
    pub request_id: String,
}

impl ApiRequest {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a parameter value.
    #[must_use]
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Protocol for fetching JSON documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Performs the request and decodes the body as JSON.
    async fn get_json(&self, request: &ApiRequest) -> Result<serde_json::Value>;
}

/// [`JsonFetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    retry: RetryConfig,
}

impl ReqwestFetcher {
    /// Builds the client from the HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ChatBotError::configuration(format!("invalid user agent: {e}")))?;
        headers.insert(header::USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout()?)
            .build()
            .map_err(|e| ChatBotError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Client, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    async fn get_once(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        let started = Instant::now();
        let response = self
            .client
            .get(&request.url)
            .query(&request.params)
            .send()
            .await?;
        let status = response.status();
        debug!(
            status = status.as_u16(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Response received"
        );
        let response = response.error_for_status()?;
        Ok(response.json::<serde_json::Value>().await?)
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn get_json(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        let span = tracing::info_span!(
            "api_request",
            request_id = %request.request_id,
            url = %request.url,
        );

        async {
            let mut attempt = 0;
            loop {
                match self.get_once(request).await {
                    Ok(value) => return Ok(value),
                    Err(err)
                        if attempt < self.retry.max_retries
                            && err.is_retryable(&self.retry) =>
                    {
                        let delay = self.retry.delay_for_attempt(attempt);
                        warn!(
                            attempt = attempt + 1,
                            error = %err,
                            "Request failed. Retrying in {:?}", delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Err(err) => {
                        info!(error = %err, kind = %err.kind(), "Request failed");
                        return Err(err);
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
