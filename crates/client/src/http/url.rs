//! Base URL handling for the article service.

/// Error type for base URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty base URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Parse and normalize the configured base URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an http or https scheme
/// 3. Drop any query string and fragment
pub fn parse_base(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Append a request path to the base URL, keeping any path prefix the base
/// already has. Slashes at the seam are collapsed to one.
pub fn join(base: &url::Url, path: &str) -> url::Url {
    let mut joined = base.clone();
    let prefix = base.path().trim_end_matches('/');
    let relative = path.trim_start_matches('/');
    joined.set_path(&format!("{prefix}/{relative}"));
    joined
}
