//! Observable state of a cache entry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// Entry exists (e.g. has a subscriber) but was never fetched.
    #[default]
    Uninitialized,
    Loading,
    Success,
    Error,
}

impl QueryStatus {
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// A fetch has completed, one way or the other.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Snapshot of one cache entry as seen by readers.
///
/// `data` holds the last successful body and survives later failures and
/// refetches until a new success replaces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub status: QueryStatus,
    pub data: Option<Arc<Value>>,
    pub error: Option<TransportError>,
    /// Marked invalid by a mutation; the next query refetches.
    pub stale: bool,
    /// When the last fetch settled.
    pub updated_at: Option<DateTime<Utc>>,
}

impl QueryState {
    pub(crate) fn failed(error: TransportError) -> Self {
        Self { status: QueryStatus::Error, error: Some(error), updated_at: Some(Utc::now()), ..Default::default() }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Decode the cached body into a typed view.
    ///
    /// A body that does not fit `T` turns the view into an error state; the
    /// cache entry itself is left untouched.
    pub fn decode<T: DeserializeOwned>(&self) -> TypedState<T> {
        let mut typed = TypedState {
            status: self.status,
            data: None,
            error: self.error.clone(),
            stale: self.stale,
            updated_at: self.updated_at,
        };

        if let Some(raw) = &self.data {
            match T::deserialize(raw.as_ref()) {
                Ok(value) => typed.data = Some(value),
                Err(e) => {
                    tracing::warn!(error = %e, "cached body does not match expected shape");
                    typed.status = QueryStatus::Error;
                    typed.error = Some(TransportError::decode(e));
                }
            }
        }

        typed
    }
}

/// [`QueryState`] with its body decoded into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<TransportError>,
    pub stale: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for TypedState<T> {
    fn default() -> Self {
        Self { status: QueryStatus::Uninitialized, data: None, error: None, stale: false, updated_at: None }
    }
}

impl<T> TypedState<T> {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}
