//! In-memory query cache for remote collections.
//!
//! This module provides the client-side synchronization layer:
//!
//! - Entries addressed by [`QueryKey`] with loading/success/error states
//! - At most one in-flight fetch per key; concurrent readers share it
//! - Tag-based invalidation through an explicit tag → keys index
//! - Watch-style [`Subscription`]s for state transitions
//! - Retention of unsubscribed entries for a configurable window

pub mod key;
pub mod state;
pub mod store;
pub mod subscription;

pub use key::{QueryKey, Tag, TagId};
pub use state::{QueryState, QueryStatus, TypedState};
pub use store::{CacheConfig, QueryCache, TagProvider};
pub use subscription::Subscription;
