//! The HTTP seam between extraction logic and the network.
//!
//! [`PlatformExtractor`](crate::PlatformExtractor) only ever talks to a
//! [`Transport`]; production wires in [`ReqwestTransport`] and tests swap in
//! fakes that return canned bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ScraperError;

/// One outbound GET, fully described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub user_agent: String,
    /// Extra headers in send order, e.g. `("accept", "application/json")`.
    pub headers: Vec<(String, String)>,
}

/// Status and decoded body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP status line.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error requesting {url}: {message}")]
    Network { url: String, message: String },

    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Performs a single GET. Non-2xx statuses are returned as responses, not
/// errors, so callers can tell "blocked" apart from "unreachable".
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut builder = self
            .client
            .get(&request.url)
            .header(reqwest::header::USER_AGENT, &request.user_agent);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                TransportError::Network {
                    url: request.url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::Body {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        Ok(FetchResponse { status, body })
    }
}
