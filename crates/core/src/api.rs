//! Endpoint definitions for the article service.
//!
//! Each read goes through the shared [`QueryCache`]; the one write
//! invalidates the article list so the next read refetches it.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::cache::{QueryCache, QueryKey, Tag, TagProvider, TypedState};
use crate::error::TransportError;
use crate::model::{Article, HealthStatus, SearchResult};
use crate::remote::RemoteClient;

/// Endpoint name of the article list query.
pub const ARTICLES_ENDPOINT: &str = "articles";

/// Endpoint name of the search query.
pub const SEARCH_ENDPOINT: &str = "search";

/// Tag family for article entries.
pub const ARTICLES_TAG: &str = "Articles";

/// Typed access to the article service through the query cache.
pub struct ArticlesApi<C> {
    client: Arc<C>,
    cache: QueryCache,
}

impl<C> Clone for ArticlesApi<C> {
    fn clone(&self) -> Self {
        Self { client: Arc::clone(&self.client), cache: self.cache.clone() }
    }
}

impl<C: RemoteClient + 'static> ArticlesApi<C> {
    pub fn new(client: Arc<C>, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn articles_key() -> QueryKey {
        QueryKey::new(ARTICLES_ENDPOINT, "")
    }

    pub fn search_key(term: &str) -> QueryKey {
        QueryKey::new(SEARCH_ENDPOINT, term)
    }

    /// All indexed articles (`GET /articles`), tagged as the list and by title.
    pub async fn articles(&self) -> TypedState<Vec<Article>> {
        let client = Arc::clone(&self.client);
        let fetch = move || async move { client.get("/articles", &[]).await };
        let tags = vec![Tag::list(ARTICLES_TAG)];
        self.cache
            .query_with(Self::articles_key(), tags, Some(article_tags as TagProvider), fetch)
            .await
            .decode()
    }

    /// Search results for `term` (`GET /search?query=<term>`).
    ///
    /// Every distinct term is its own entry; the empty term is fetched like
    /// any other.
    pub async fn search(&self, term: &str) -> TypedState<Vec<SearchResult>> {
        let client = Arc::clone(&self.client);
        let query = term.to_string();
        self.cache
            .query(Self::search_key(term), vec![], move || async move {
                client.get("/search", &[("query", query.as_str())]).await
            })
            .await
            .decode()
    }

    /// Ask the service to pull in new articles (`POST /articles`).
    ///
    /// On success the cached article list goes stale. Returns whatever
    /// articles the service reports as added.
    pub async fn fetch_new_articles(&self) -> Result<Vec<Article>, TransportError> {
        let client = Arc::clone(&self.client);
        let response = self
            .cache
            .mutate(move || async move { client.post("/articles", &json!({})).await }, &[Tag::list(ARTICLES_TAG)])
            .await?;

        match response {
            Value::Null => Ok(Vec::new()),
            body => serde_json::from_value(body).map_err(TransportError::decode),
        }
    }

    /// Landing endpoint (`GET /`). Not cached.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let body = self.client.get("/", &[]).await?;
        serde_json::from_value(body).map_err(TransportError::decode)
    }
}

/// One `Articles:<title>` tag per article in a fetched list.
fn article_tags(data: &Value) -> Vec<Tag> {
    data.as_array()
        .into_iter()
        .flatten()
        .filter_map(|article| article.get("title").and_then(Value::as_str))
        .map(|title| Tag::item(ARTICLES_TAG, title))
        .collect()
}
