//! Command-line interface definitions for Lounge Catalogue.
//!
//! Every option has a default, so running the binary with no arguments
//! crawls the full Priority Pass lounge index with the built-in rules.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Lounge Catalogue application.
///
/// # Examples
///
/// ```sh
/// # Full crawl, report on stdout
/// lounge_catalogue
///
/// # Airports only, no detail pages
/// lounge_catalogue --skip-terminals
///
/// # Four detail pages in flight, plus a JSON snapshot
/// lounge_catalogue --concurrency 4 --json-output-dir ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Site origin used to resolve the index page and airport URLs
    #[arg(long, env = "LOUNGE_BASE_URL", default_value = "https://www.prioritypass.com")]
    pub base_url: String,

    /// Path of the airport index page
    #[arg(long, default_value = "/airport-lounges")]
    pub index_path: String,

    /// Optional YAML file overriding the extraction rules
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Only list airports; do not fetch airport pages for terminals
    #[arg(long)]
    pub skip_terminals: bool,

    /// Maximum number of airport pages fetched at once
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Optional directory for a dated JSON snapshot of the catalogue
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}
