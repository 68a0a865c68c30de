//! HTTP client abstraction for testability.
//!
//! Both the search sources and the tile image loader talk to the network
//! through [`AsyncHttpClient`], so tests can substitute a canned client.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Largest streamed body accepted before the download is abandoned.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// Upper bound on the buffer reserved from an announced Content-Length.
/// The header is untrusted; larger bodies grow the buffer as they arrive.
const MAX_PREALLOC_BYTES: u64 = 1024 * 1024;

/// User-Agent sent with every request.
///
/// Some image APIs (Pexels in particular) answer 403 to generic agents.
const DEFAULT_USER_AGENT: &str = concat!("imagesearch/", env!("CARGO_PKG_VERSION"));

/// Errors produced by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection or protocol failure before a response arrived.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("failed to read response from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Trait for asynchronous HTTP client operations.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    /// Performs an HTTP GET request with extra headers.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Slice of (header_name, header_value) tuples
    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;

    /// Performs an HTTP GET request, reporting each received chunk.
    ///
    /// `on_chunk` is called with the number of bytes received so far and the
    /// announced content length, if the server sent one.
    fn get_streaming<F>(
        &self,
        url: &str,
        on_chunk: F,
    ) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send
    where
        F: FnMut(u64, Option<u64>) + Send;
}

/// HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
    max_body_bytes: u64,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        Self::from_builder(builder(timeout_secs))
    }

    /// Sets the largest body [`get_streaming`](AsyncHttpClient::get_streaming)
    /// accepts.
    pub fn with_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self, HttpError> {
        let client = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match request.send().await {
            Ok(resp) => {
                debug!(url = url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(request_error(url, &e));
            }
        };

        if !response.status().is_success() {
            warn!(url = url, status = response.status().as_u16(), "HTTP error status");
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

fn builder(timeout_secs: u64) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(DEFAULT_USER_AGENT)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
}

fn too_large(url: &str, bytes: u64, limit: u64) -> HttpError {
    warn!(url = url, bytes = bytes, limit = limit, "HTTP body too large");
    HttpError::Body {
        url: url.to_string(),
        reason: format!("body of {} bytes exceeds the {} byte limit", bytes, limit),
    }
}

fn request_error(url: &str, e: &reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout {
            url: url.to_string(),
        }
    } else {
        HttpError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

fn body_error(url: &str, e: &reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout {
            url: url.to_string(),
        }
    } else {
        HttpError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.send(self.client.get(url), url).await?;

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => Err(body_error(url, &e)),
        }
    }

    async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, HttpError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = self.send(request, url).await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| body_error(url, &e))
    }

    async fn get_streaming<F>(&self, url: &str, mut on_chunk: F) -> Result<Vec<u8>, HttpError>
    where
        F: FnMut(u64, Option<u64>) + Send,
    {
        let mut response = self.send(self.client.get(url), url).await?;
        let total = response.content_length();
        if let Some(total) = total.filter(|t| *t > self.max_body_bytes) {
            return Err(too_large(url, total, self.max_body_bytes));
        }

        let reserve = total.map_or(0, |t| t.min(MAX_PREALLOC_BYTES)) as usize;
        let mut body = Vec::with_capacity(reserve);

        while let Some(chunk) = response.chunk().await.map_err(|e| body_error(url, &e))? {
            let received = (body.len() + chunk.len()) as u64;
            if received > self.max_body_bytes {
                return Err(too_large(url, received, self.max_body_bytes));
            }
            body.extend_from_slice(&chunk);
            on_chunk(body.len() as u64, total);
        }

        trace!(url = url, bytes = body.len(), "HTTP streamed body read");
        Ok(body)
    }
}
