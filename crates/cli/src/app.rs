//! Drives the article service through the query cache and renders results.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use wsearch_core::view::{self, ArticleListView};
use wsearch_core::{ArticlesApi, RemoteClient};

use crate::args::Command;
use crate::render::{Style, render_view};

/// One terminal session over a shared [`ArticlesApi`].
pub struct App<C> {
    api: ArticlesApi<C>,
    color: bool,
}

impl<C: RemoteClient + 'static> App<C> {
    pub fn new(api: ArticlesApi<C>, color: bool) -> Self {
        Self { api, color }
    }

    pub async fn run<R, W>(&self, command: Command, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match command {
            Command::List | Command::Search { .. } => {
                self.show(&command.initial_term(), out).await?;
            }
            Command::Refresh => {
                self.refresh(out).await?;
                self.show("", out).await?;
            }
            Command::Health => {
                let health = self.api.health().await?;
                writeln!(out, "{}", health.message)?;
            }
            Command::Interactive => self.interactive(input, out).await?,
        }
        Ok(())
    }

    /// Read articles and search results for `term` together, then draw the
    /// list.
    pub async fn show<W: Write>(&self, term: &str, out: &mut W) -> Result<ArticleListView> {
        let (articles, search) = tokio::join!(self.api.articles(), self.api.search(term));

        let disabled = view::compute_disabled(&[articles.status, search.status]);
        let selected = view::select_view(&articles, &search);
        tracing::debug!(term, articles = ?articles.status, search = ?search.status, disabled, "rendering article list");

        let style = Style { color: self.color, searching: !term.is_empty(), disabled };
        render_view(out, &selected, style)?;

        Ok(selected)
    }

    /// Ask the service for new articles; the cached list goes stale.
    pub async fn refresh<W: Write>(&self, out: &mut W) -> Result<()> {
        let added = self.api.fetch_new_articles().await?;
        writeln!(out, "Fetched {} new articles", added.len())?;
        Ok(())
    }

    /// Each input line replaces the search term and redraws the list.
    pub async fn interactive<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut term = String::new();
        self.show(&term, out).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match line.trim() {
                ":quit" | ":q" => break,
                ":refresh" => {
                    if let Err(e) = self.refresh(out).await {
                        tracing::warn!(error = %e, "refresh failed");
                        writeln!(out, "Refresh failed: {e}")?;
                    }
                }
                typed => term = typed.to_string(),
            }
            self.show(&term, out).await?;
        }

        Ok(())
    }
}
