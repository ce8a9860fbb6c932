//! Command-line arguments for the wsearch binary.

use clap::{Parser, Subcommand};

/// Browse and search the article index from a terminal.
#[derive(Parser, Debug)]
#[command(name = "wsearch", version)]
pub struct Cli {
    /// Article service base URL (overrides configuration)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Never emit ANSI styling, even on a terminal
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show every article
    List,

    /// Show every article, highlighting those matching the search terms
    Search {
        /// Search terms, joined with single spaces
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Ask the service for new articles, then show the refreshed list
    Refresh,

    /// Check that the service is reachable
    Health,

    /// Read search terms line by line from stdin
    ///
    /// `:refresh` fetches new articles, `:quit` exits.
    Interactive,
}

impl Command {
    /// Search term this command starts with. Empty means no filter.
    pub fn initial_term(&self) -> String {
        match self {
            Command::Search { terms } => terms.join(" "),
            _ => String::new(),
        }
    }
}
