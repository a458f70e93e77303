//! Command-line surface of the `ngscrape` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ngscrape_engine::{ParserMode, ScrapeConfig};

use crate::logging::LogDestination;

pub const DEFAULT_PORTAL_BASE: &str = "https://www.newgrounds.com/portal/view";

/// Scrape flash game pages for their asset, card image, description and title.
#[derive(Debug, Parser)]
#[command(name = "ngscrape", version)]
#[command(about = "Scrape flash game pages for their asset, card image, description and title", long_about = None)]
pub struct Cli {
    /// Log one line per extraction step.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Reuse fetched pages for repeated requests to the same URL.
    #[arg(long, global = true)]
    pub cache: bool,

    /// Markup parser: `lenient-html` (default) or `strict-xml-like`.
    #[arg(long, global = true, default_value = "lenient-html", value_name = "PARSER")]
    pub parser: ParserMode,

    /// Also write logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the title, description, card link and game link of a page.
    Show {
        /// Game page URL, e.g. https://www.newgrounds.com/portal/view/59593.
        url: String,
        /// Print a JSON object instead of plain lines.
        #[arg(long)]
        json: bool,
    },

    /// Download the game asset of a page (and optionally its card image).
    Download {
        /// Game page URL.
        url: String,
        /// Directory to write into; created when missing.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// File name for the game asset. Derived from the page title when omitted.
        #[arg(long)]
        name: Option<String>,
        /// Also download the card image next to the game.
        #[arg(long)]
        card: bool,
    },

    /// Walk a range of portal ids and print every game that has a description.
    Scan {
        /// First id (inclusive).
        #[arg(long)]
        start: u64,
        /// Last id (inclusive).
        #[arg(long)]
        end: u64,
        /// Number of concurrent workers sharing one extractor.
        #[arg(long, default_value_t = 4)]
        workers: usize,
        /// Page URL prefix; the id is appended after a `/`.
        #[arg(long, default_value = DEFAULT_PORTAL_BASE)]
        base: String,
    },
}

impl Cli {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            debug: self.debug,
            cache: self.cache,
            parser: self.parser,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }
}
