//! Reader handles on a single cache entry.

use std::sync::Weak;
use std::time::Instant;

use tokio::sync::watch;

use super::key::QueryKey;
use super::state::QueryState;
use super::store::Inner;

/// Live view of one cache entry.
///
/// Each state transition of the entry (loading, settled, invalidated) is
/// observable through [`Subscription::changed`]. Dropping the handle lowers
/// the entry's subscriber count and starts its retention window.
pub struct Subscription {
    key: QueryKey,
    rx: watch::Receiver<QueryState>,
    cache: Weak<Inner>,
}

impl Subscription {
    pub(crate) fn new(key: QueryKey, rx: watch::Receiver<QueryState>, cache: Weak<Inner>) -> Self {
        Self { key, rx, cache }
    }

    /// Latest state, without waiting.
    pub fn current(&self) -> QueryState {
        self.rx.borrow().clone()
    }

    /// Wait for the next transition.
    ///
    /// Returns `None` once the cache has been shut down.
    pub async fn changed(&mut self) -> Option<QueryState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.cache.upgrade()
            && let Some(entry) = inner.store.lock().entries.get_mut(&self.key)
        {
            entry.last_used = Instant::now();
        }
    }
}
