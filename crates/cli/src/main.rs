//! wsearch entry point.
//!
//! Loads configuration, builds the HTTP client and query cache, and runs one
//! command. Logging goes to stderr so stdout carries only the rendered list.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wsearch_client::HttpClient;
use wsearch_core::{AppConfig, ArticlesApi, CacheConfig, QueryCache};

mod app;
mod args;
mod render;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = args::Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }
    tracing::info!(base_url = %config.base_url, "starting wsearch");

    let client = Arc::new(HttpClient::from_config(&config)?);
    let cache = QueryCache::new(CacheConfig::from(&config));
    let color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(ArticlesApi::new(client, cache.clone()), color);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = app.run(cli.command, stdin, &mut std::io::stdout()).await;

    cache.shutdown();

    result
}
