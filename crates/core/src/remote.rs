//! Remote Data Client contract.
//!
//! The cache and API layers speak to the article service only through
//! [`RemoteClient`], so the HTTP implementation lives in `wsearch-client`
//! and tests can substitute an in-memory fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

/// Stateless request/response access to the article service.
///
/// Paths are relative to a base URL fixed at construction. Implementations
/// fail fast: no retries, and no timeout beyond what the transport applies.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Issue a GET and return the decoded JSON body.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError>;

    /// Issue a POST with a JSON body and return the decoded JSON body.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

/// Reject paths that cannot address an endpoint.
pub fn validate_path(path: &str) -> Result<&str, TransportError> {
    if path.trim().is_empty() {
        return Err(TransportError::invalid_path(path));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_accepts_relative_paths() {
        assert_eq!(validate_path("/articles").unwrap(), "/articles");
        assert_eq!(validate_path("/").unwrap(), "/");
        assert_eq!(validate_path("search").unwrap(), "search");
    }

    #[test]
    fn test_validate_path_rejects_empty() {
        assert!(validate_path("").is_err());
        assert!(validate_path("   ").is_err());
    }
}
