//! # Lounge Catalogue
//!
//! Builds a catalogue of airport lounge locations from the Priority Pass
//! website: every airport on the lounge index page, its country and city
//! inferred from the URL, and the terminals listed on the airport's own page.
//!
//! ## Usage
//!
//! ```sh
//! lounge_catalogue --concurrency 4 --json-output-dir ./json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Indexing**: Fetch the index page and extract airports (fatal on failure)
//! 2. **Terminals**: Fetch each airport page and extract its terminals (failures skipped)
//! 3. **Output**: Print the text report to stdout, optionally write a JSON snapshot
//!
//! Logs go to stderr so stdout carries only the report.

use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetch;
mod location;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use outputs::{json, report::Report};
use pipeline::{PipelineOptions, Source, build_catalogue};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lounge_catalogue starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let source = match Source::new(&args.base_url, &args.index_path) {
        Ok(source) => source,
        Err(e) => {
            error!(base_url = %args.base_url, index_path = %args.index_path, error = %e, "Invalid source URL");
            return Err(e);
        }
    };
    let rules = match config::load_rules(args.rules.as_deref()).await {
        Ok(rules) => rules,
        Err(e) => {
            error!(error = %e, "Failed to load extraction rules");
            return Err(e);
        }
    };
    let fetcher = HttpFetcher::new()?;
    let options = PipelineOptions {
        populate_terminals: !args.skip_terminals,
        concurrency: usize::from(args.concurrency),
    };

    // ---- Crawl ----
    let catalogue = match build_catalogue(&fetcher, &source, &rules, options).await {
        Ok(catalogue) => catalogue,
        Err(e) => {
            error!(error = %e, "Failed to fetch the airport index; aborting");
            return Err(e.into());
        }
    };

    // ---- Report ----
    {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", Report(&catalogue.airports))?;
        stdout.flush()?;
    }

    if let Some(ref json_output_dir) = args.json_output_dir {
        if let Err(e) = json::write_catalogue(&catalogue, json_output_dir).await {
            error!(error = %e, "Failed to write catalogue JSON");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        airports = catalogue.airports.len(),
        terminals = catalogue.terminal_count(),
        "Execution complete"
    );

    Ok(())
}
