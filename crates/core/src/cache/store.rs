//! The shared query cache.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

use super::key::{QueryKey, Tag};
use super::state::{QueryState, QueryStatus};
use super::subscription::Subscription;
use crate::config::AppConfig;
use crate::error::{Error, TransportError};

/// Derives extra tags from a freshly fetched body, e.g. one tag per item.
pub type TagProvider = fn(&Value) -> Vec<Tag>;

/// Retention settings for the query cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry with no subscribers is kept before pruning.
    pub keep_unused: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { keep_unused: Duration::from_secs(60) }
    }
}

impl From<&AppConfig> for CacheConfig {
    fn from(config: &AppConfig) -> Self {
        Self { keep_unused: config.keep_unused() }
    }
}

pub(crate) struct Entry {
    state: watch::Sender<QueryState>,
    tags: HashSet<Tag>,
    in_flight: bool,
    pub(crate) last_used: Instant,
}

impl Entry {
    fn new() -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self { state, tags: HashSet::new(), in_flight: false, last_used: Instant::now() }
    }

    fn current(&self) -> QueryState {
        self.state.borrow().clone()
    }

    fn is_fresh(&self) -> bool {
        let state = self.state.borrow();
        !self.in_flight && !state.stale && state.status.is_settled()
    }

    fn is_unused(&self, keep_unused: Duration) -> bool {
        !self.in_flight && self.state.receiver_count() == 0 && self.last_used.elapsed() >= keep_unused
    }
}

#[derive(Default)]
pub(crate) struct Store {
    pub(crate) entries: HashMap<QueryKey, Entry>,
    tag_index: HashMap<Tag, HashSet<QueryKey>>,
    closed: bool,
}

impl Store {
    fn unindex(&mut self, key: &QueryKey, tags: &HashSet<Tag>) {
        for tag in tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
    }

    fn index(&mut self, key: &QueryKey, tags: &HashSet<Tag>) {
        for tag in tags {
            self.tag_index.entry(tag.clone()).or_default().insert(key.clone());
        }
    }

    fn entry_mut(&mut self, key: &QueryKey) -> Result<&mut Entry, Error> {
        self.entries.get_mut(key).ok_or_else(|| Error::CacheMiss(key.to_string()))
    }

    fn prune_unused(&mut self, keep_unused: Duration) -> usize {
        let doomed: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_unused(keep_unused))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            if let Some(entry) = self.entries.remove(key) {
                self.unindex(key, &entry.tags);
            }
        }

        doomed.len()
    }
}

pub(crate) struct Inner {
    pub(crate) store: Mutex<Store>,
    config: CacheConfig,
}

impl Inner {
    /// Record the outcome of a fetch and wake every reader of the entry.
    fn settle(
        &self, key: &QueryKey, tags: Vec<Tag>, provides: Option<TagProvider>, outcome: Result<Value, TransportError>,
    ) {
        let mut store = self.store.lock();
        let entry = match store.entry_mut(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "entry dropped before fetch settled");
                return;
            }
        };
        entry.in_flight = false;

        match outcome {
            Ok(data) => {
                let mut tags: HashSet<Tag> = tags.into_iter().collect();
                if let Some(provides) = provides {
                    tags.extend(provides(&data));
                }
                let previous = std::mem::replace(&mut entry.tags, tags.clone());
                entry.state.send_modify(|state| {
                    state.status = QueryStatus::Success;
                    state.data = Some(Arc::new(data));
                    state.error = None;
                    state.updated_at = Some(Utc::now());
                });
                store.unindex(key, &previous);
                store.index(key, &tags);
                tracing::debug!(%key, tags = tags.len(), "query settled");
            }
            Err(error) => {
                tracing::warn!(%key, status = ?error.status, error = %error.message, "query failed");
                entry.state.send_modify(|state| {
                    state.status = QueryStatus::Error;
                    state.error = Some(error);
                    state.updated_at = Some(Utc::now());
                });
            }
        }
    }
}

/// Single source of truth for remote data.
///
/// Entries are addressed by [`QueryKey`], de-duplicated while in flight, and
/// invalidated in bulk through [`Tag`]s. Cloning the handle shares the same
/// store. Create one at startup and call [`QueryCache::shutdown`] on exit.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { inner: Arc::new(Inner { store: Mutex::new(Store::default()), config }) }
    }

    /// Read `key`, fetching it only when missing or stale.
    ///
    /// See [`QueryCache::query_with`].
    pub async fn query<F, Fut>(&self, key: QueryKey, tags: Vec<Tag>, fetcher: F) -> QueryState
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value, TransportError>> + Send + 'static,
    {
        self.query_with(key, tags, None, fetcher).await
    }

    /// Read `key`, fetching it only when missing or stale.
    ///
    /// A fresh settled entry is returned without touching the network. If a
    /// fetch for `key` is already in flight the caller waits for it instead of
    /// starting another. Otherwise the entry is marked loading and `fetcher`
    /// runs exactly once on a detached task, so it completes and populates the
    /// cache even if every caller goes away.
    ///
    /// Failures are reported through the returned state, never as `Err`.
    /// Must be called from within a tokio runtime.
    pub async fn query_with<F, Fut>(
        &self, key: QueryKey, tags: Vec<Tag>, provides: Option<TagProvider>, fetcher: F,
    ) -> QueryState
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value, TransportError>> + Send + 'static,
    {
        let mut rx = {
            let mut store = self.inner.store.lock();
            if store.closed {
                return QueryState::failed(TransportError::network("query cache is shut down"));
            }
            store.prune_unused(self.inner.config.keep_unused);

            let entry = store.entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.last_used = Instant::now();

            if entry.is_fresh() {
                tracing::trace!(%key, "cache hit");
                return entry.current();
            }

            let rx = entry.state.subscribe();
            if entry.in_flight {
                tracing::debug!(%key, "joining in-flight query");
            } else {
                tracing::debug!(%key, "fetching");
                entry.in_flight = true;
                entry.state.send_modify(|state| {
                    state.status = QueryStatus::Loading;
                    state.stale = false;
                });

                // Caller tags are indexed up front so a failed fetch can still be invalidated.
                let added: HashSet<Tag> = tags.iter().filter(|tag| !entry.tags.contains(*tag)).cloned().collect();
                entry.tags.extend(added.iter().cloned());
                self.spawn_fetch(key.clone(), tags, provides, fetcher);
                store.index(&key, &added);
            }
            rx
        };

        match rx.wait_for(|state| state.status.is_settled()).await {
            Ok(state) => state.clone(),
            Err(_) => QueryState::failed(TransportError::network("query cache is shut down")),
        }
    }

    fn spawn_fetch<F, Fut>(&self, key: QueryKey, tags: Vec<Tag>, provides: Option<TagProvider>, fetcher: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value, TransportError>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = match tokio::spawn(fetcher()).await {
                Ok(outcome) => outcome,
                Err(e) => Err(TransportError::network(format!("fetch task failed: {e}"))),
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::debug!(%key, elapsed_ms, ok = outcome.is_ok(), "fetch finished");
            inner.settle(&key, tags, provides, outcome);
        });
    }

    /// Run a write, then invalidate every entry tagged with any of
    /// `invalidate_tags`.
    ///
    /// Nothing is invalidated when the write fails.
    pub async fn mutate<F, Fut>(&self, fetcher: F, invalidate_tags: &[Tag]) -> Result<Value, TransportError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, TransportError>>,
    {
        let response = fetcher().await.inspect_err(|e| {
            tracing::warn!(status = ?e.status, error = %e.message, "mutation failed");
        })?;

        let invalidated = self.invalidate(invalidate_tags);
        tracing::debug!(invalidated, "mutation applied");

        Ok(response)
    }

    /// Mark every entry carrying one of `tags` as stale and notify its
    /// subscribers, in one step. Returns the number of entries touched.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut store = self.inner.store.lock();

        let keys: HashSet<QueryKey> =
            tags.iter().filter_map(|tag| store.tag_index.get(tag)).flatten().cloned().collect();

        for key in &keys {
            if let Some(entry) = store.entries.get_mut(key) {
                entry.state.send_modify(|state| state.stale = true);
            }
        }

        keys.len()
    }

    /// Observe `key` without fetching it. Creates an uninitialized entry if
    /// none exists yet.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        let mut store = self.inner.store.lock();
        let rx = if store.closed {
            watch::channel(QueryState::default()).1
        } else {
            let entry = store.entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.last_used = Instant::now();
            entry.state.subscribe()
        };
        Subscription::new(key, rx, Arc::downgrade(&self.inner))
    }

    /// Live readers of `key`, including callers waiting on an in-flight fetch.
    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.inner
            .store
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.state.receiver_count())
            .unwrap_or(0)
    }

    /// Current state of `key` without fetching.
    pub fn state(&self, key: &QueryKey) -> Option<QueryState> {
        self.inner.store.lock().entries.get(key).map(Entry::current)
    }

    /// Drop entries nobody has read within the retention window.
    pub fn prune_unused(&self) -> usize {
        let pruned = self.inner.store.lock().prune_unused(self.inner.config.keep_unused);
        if pruned > 0 {
            tracing::debug!(pruned, "pruned unused cache entries");
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.inner.store.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tear the cache down: every entry is dropped and every subscription
    /// closes. Later queries fail without fetching.
    pub fn shutdown(&self) {
        let mut store = self.inner.store.lock();
        store.closed = true;
        store.tag_index.clear();
        let dropped = store.entries.len();
        store.entries.clear();
        tracing::info!(dropped, "query cache shut down");
    }
}
