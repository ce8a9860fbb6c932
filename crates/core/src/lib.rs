//! Core types and shared functionality for wsearch.
//!
//! This crate provides:
//! - Article and search result wire types
//! - Unified error types
//! - Configuration structures
//! - The query cache and the article service endpoints built on it
//! - Presentation logic for the article list

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod view;

pub use api::ArticlesApi;
pub use cache::{CacheConfig, QueryCache, QueryKey, QueryState, QueryStatus, Subscription, Tag, TypedState};
pub use config::{AppConfig, ConfigError};
pub use error::{Error, TransportError};
pub use model::{Article, HealthStatus, SearchResult};
pub use remote::RemoteClient;
