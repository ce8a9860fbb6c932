//! Client code for wsearch.
//!
//! This crate provides the HTTP transport behind the core `RemoteClient`
//! contract, used by the CLI to reach the article service.

pub mod http;

pub use http::{HttpClient, HttpConfig};
