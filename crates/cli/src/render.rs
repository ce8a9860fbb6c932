//! Terminal rendering of the article list.

use std::io::{self, Write};

use wsearch_core::view::{ArticleListView, ArticleRow, article_link_target};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// How the list should be drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    /// Emit ANSI bold/dim sequences.
    pub color: bool,
    /// A search term is active, so rows are split into matched and dimmed.
    pub searching: bool,
    /// Actions depending on the queries are unavailable.
    pub disabled: bool,
}

pub fn render_view(out: &mut impl Write, view: &ArticleListView, style: Style) -> io::Result<()> {
    match view {
        ArticleListView::Error(message) => writeln!(out, "{message}"),
        ArticleListView::Loading => writeln!(out, "Loading articles..."),
        ArticleListView::List(rows) => render_rows(out, rows, style),
    }
}

fn render_rows(out: &mut impl Write, rows: &[ArticleRow], style: Style) -> io::Result<()> {
    let action = if style.disabled { "refresh (busy)" } else { "refresh" };
    if style.searching {
        let matched = rows.iter().filter(|row| row.matched).count();
        writeln!(out, "{} articles, {} matching  [{action}]", rows.len(), matched)?;
    } else {
        writeln!(out, "{} articles  [{action}]", rows.len())?;
    }

    for row in rows {
        let title = &row.article.title;
        let link = article_link_target(title);
        let (marker, ansi) = match (style.searching, row.matched) {
            (true, true) => ("*", BOLD),
            (true, false) => (" ", DIM),
            (false, _) => (" ", ""),
        };

        if style.color && !ansi.is_empty() {
            writeln!(out, "{ansi}{marker} {title}  {link}{RESET}")?;
        } else {
            writeln!(out, "{marker} {title}  {link}")?;
        }
    }

    Ok(())
}
