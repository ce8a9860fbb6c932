//! Unified error types for wsearch.
//!
//! Transport failures are the only errors that reach a reader of the query
//! cache, and they arrive as data (`QueryState::error`) rather than as `Err`.

use crate::config::ConfigError;

/// Failure of a single request against the remote article service.
///
/// `status` carries the HTTP status for non-2xx responses and is `None` for
/// network, path, and decode failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("TRANSPORT_ERROR: {message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    /// Non-2xx response from the server.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }

    /// Connection refused, DNS failure, reset, and similar.
    pub fn network(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    /// Response body was not the JSON shape we expected.
    pub fn decode(message: impl std::fmt::Display) -> Self {
        Self { status: None, message: format!("invalid response body: {message}") }
    }

    /// Request path rejected before reaching the network.
    pub fn invalid_path(path: &str) -> Self {
        Self { status: None, message: format!("invalid request path: {path:?}") }
    }
}

/// Unified error type for the wsearch crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request to the article service failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid input parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// No cache entry for the given key. Raised and logged inside the cache;
    /// never handed to readers.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),
}
