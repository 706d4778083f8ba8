//! HTTP transport
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured identification header
//! - Following redirects so the final URL reflects upstream clamping
//! - Retrying on configured status codes and transient network errors
//! - Error classification

use crate::config::{ClientConfig, Config, RetryConfig};
use crate::{Result, SpacerError};
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Maximum number of redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successful response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Page body content
    pub body: String,
}

/// When and how often a request is retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub status_codes: Vec<u16>,
}

impl RetryPolicy {
    /// Delay before the given retry (1-based): `backoff_factor * 2^(retry-1)` seconds
    ///
    /// Saturates at `Duration::MAX`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(30) as i32;
        Duration::try_from_secs_f64(self.backoff_factor * 2f64.powi(exponent))
            .unwrap_or(Duration::MAX)
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.status_codes.contains(&status)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor,
            status_codes: config.status_codes.clone(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use spacer::config::ClientConfig;
/// use spacer::crawler::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A pooled HTTP session with retry
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    retry: Arc<RetryPolicy>,
}

impl Transport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.client).map_err(|source| SpacerError::Http {
            url: config.client.base_url.clone(),
            source,
        })?;

        Ok(Self::with_client(client, RetryPolicy::from(&config.retry)))
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry: Arc::new(retry),
        }
    }

    /// Fetches a URL, retrying per the retry policy
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Status in `status_codes` | Retry, then `RetriesExhausted` |
    /// | Other non-2xx status | Immediate `Status` |
    /// | Timeout / connect error | Retry, then `Http` |
    /// | Other network error | Immediate `Http` |
    pub async fn get(&self, url: &Url) -> Result<RawResponse> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let can_retry = attempt <= self.retry.max_retries;

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();

                    if self.retry.is_retryable(status.as_u16()) {
                        if can_retry {
                            tracing::warn!(
                                "HTTP {} for {}, retry {}/{}",
                                status.as_u16(),
                                url,
                                attempt,
                                self.retry.max_retries
                            );
                            tokio::time::sleep(self.retry.backoff(attempt)).await;
                            continue;
                        }
                        return Err(SpacerError::RetriesExhausted {
                            url: url.to_string(),
                            status: status.as_u16(),
                            attempts: attempt,
                        });
                    }

                    if !status.is_success() {
                        return Err(SpacerError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    let final_url = response.url().clone();
                    let body = response.text().await.map_err(|source| SpacerError::Http {
                        url: url.to_string(),
                        source,
                    })?;

                    return Ok(RawResponse {
                        final_url,
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) if can_retry && (e.is_timeout() || e.is_connect()) => {
                    tracing::warn!(
                        "Network error for {}: {}, retry {}/{}",
                        url,
                        e,
                        attempt,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                }
                Err(source) => {
                    return Err(SpacerError::Http {
                        url: url.to_string(),
                        source,
                    });
                }
            }
        }
    }
}
