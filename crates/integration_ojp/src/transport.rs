//! Transport seam between the client and the OJP endpoint

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

use crate::config::OjpConfig;
use crate::error::TransportError;

/// Raw outcome of one exchange with the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as received
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Response with status 200
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends an encoded request and returns the raw response
///
/// Implementations do not retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to the endpoint
    async fn send(&self, body: Vec<u8>) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport posting XML to a single endpoint
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a transport for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if a configured header is not a valid HTTP header or
    /// the HTTP client cannot be initialized.
    pub fn new(config: &OjpConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        for (name, value) in &config.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ojp-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Endpoint requests are sent to
    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint_url, bytes = body.len()))]
    async fn send(&self, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    TransportError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(status, bytes = body.len(), "OJP response received");
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
