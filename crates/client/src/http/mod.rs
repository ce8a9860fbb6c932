//! HTTP implementation of the Remote Data Client.
//!
//! ### Requests
//! - Paths are joined onto a base URL fixed at construction.
//! - GET carries optional query pairs; POST carries a JSON body.
//! - Responses are decoded as JSON; an empty 2xx body decodes to `null`.
//!
//! ### Failure
//! - Non-2xx responses become `TransportError` with the HTTP status.
//! - Network failures become `TransportError` without a status.
//! - No retries. No timeout unless one is configured.

pub mod url;

use reqwest::{Client, Method, RequestBuilder, header};
use serde_json::Value;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use wsearch_core::remote::validate_path;
use wsearch_core::{AppConfig, Error, RemoteClient, TransportError};

pub use self::url::{UrlError, join, parse_base};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the article service (default: "http://localhost:8000")
    pub base_url: String,

    /// User agent string (default: "wsearch/0.1")
    pub user_agent: String,

    /// Request timeout; `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8000".to_string(), user_agent: "wsearch/0.1".to_string(), timeout: None }
    }
}

impl From<&AppConfig> for HttpConfig {
    fn from(config: &AppConfig) -> Self {
        Self { base_url: config.base_url.clone(), user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

/// JSON-over-HTTP client for the article service.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base_url: ::url::Url,
}

impl HttpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let base_url = parse_base(&config.base_url).map_err(|e| Error::InvalidInput(e.to_string()))?;

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| TransportError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    /// Create a client from loaded application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(HttpConfig::from(config))
    }

    pub fn base_url(&self) -> &::url::Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<::url::Url, TransportError> {
        Ok(join(&self.base_url, validate_path(path)?))
    }

    fn request(&self, method: Method, path: &str) -> Result<(RequestBuilder, ::url::Url), TransportError> {
        let url = self.endpoint(path)?;
        let request = self
            .http
            .request(method, url.clone())
            .header(header::ACCEPT, "application/json");
        Ok((request, url))
    }

    async fn send(&self, request: RequestBuilder, method: Method, url: ::url::Url) -> Result<Value, TransportError> {
        let start = Instant::now();

        let response = request.send().await.map_err(network_error)?;
        let status = response.status();

        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(%method, %url, status = status.as_u16(), elapsed_ms, "request completed");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                text => text.to_string(),
            };
            return Err(TransportError::http(status.as_u16(), message));
        }

        let bytes = response.bytes().await.map_err(network_error)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(TransportError::decode)
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        let (mut request, url) = self.request(Method::GET, path)?;
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request, Method::GET, url).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let (request, url) = self.request(Method::POST, path)?;
        self.send(request.json(body), Method::POST, url).await
    }
}

fn network_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::network(format!("request timed out: {}", err))
    } else {
        TransportError::network(format!("network error: {}", err))
    }
}
