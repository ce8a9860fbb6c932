//! Wire types returned by the article service.

use serde::{Deserialize, Deserializer, Serialize};

/// An indexed article. Titles are treated as unique within one fetched list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default, deserialize_with = "tokenized_content")]
    pub tokenized_content: String,
}

impl Article {
    pub fn new(title: impl Into<String>, tokenized_content: impl Into<String>) -> Self {
        Self { title: title.into(), tokenized_content: tokenized_content.into() }
    }
}

/// Relevance of one article to the current search term.
///
/// Only `title` takes part in matching; `ranking` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub ranking: f64,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, ranking: f64) -> Self {
        Self { title: title.into(), ranking }
    }
}

/// Body of the service landing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
}

/// The service stores tokens as a list but older rows come back as a single
/// string; `null` means the article was never tokenized.
fn tokenized_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Tokens(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text,
        Some(Raw::Tokens(tokens)) => tokens.join(","),
        None => String::new(),
    })
}
