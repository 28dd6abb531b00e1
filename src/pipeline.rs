//! The two-stage catalogue pipeline.
//!
//! 1. **Indexing**: fetch the lounge index page and extract [`Airport`]s.
//!    Failure to fetch the index is fatal.
//! 2. **Terminals** (optional): fetch each airport's detail page and attach
//!    the extracted [`Terminal`]s. A failure here only affects that airport,
//!    whose terminal list stays empty.
//!
//! Detail pages are fetched in extraction order. With a concurrency above 1
//! several fetches are in flight at once, but results are still attached by
//! airport position so the output order never depends on response timing.

use chrono::Local;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Rules;
use crate::fetch::{FetchError, PageFetch};
use crate::models::{Airport, Catalogue, Terminal};
use crate::scrapers::{AirportRule, ExtractionRule, TerminalRule};

/// Where to read the catalogue from.
#[derive(Debug, Clone)]
pub struct Source {
    /// Origin used to resolve relative airport URLs.
    pub base_url: Url,
    /// Absolute URL of the airport index page.
    pub index_url: Url,
}

impl Source {
    /// Build a source from a base URL and the index page path.
    pub fn new(base_url: &str, index_path: &str) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url)?;
        let index_url = base_url.join(index_path)?;
        Ok(Self {
            base_url,
            index_url,
        })
    }
}

/// Knobs for [`build_catalogue`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Run the terminal stage.
    pub populate_terminals: bool,
    /// Maximum number of detail pages in flight.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            populate_terminals: true,
            concurrency: 1,
        }
    }
}

/// Outcome counts of the terminal stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalStats {
    /// Detail pages fetched and parsed.
    pub fetched: usize,
    /// Detail pages that could not be fetched.
    pub failed: usize,
}

/// Fetch the index page and extract every airport on it.
///
/// # Errors
///
/// Returns the [`FetchError`] if the index page cannot be fetched. Callers
/// treat this as fatal for the run.
#[instrument(level = "info", skip_all, fields(index_url = %index_url))]
pub async fn index_airports<F: PageFetch>(
    fetcher: &F,
    index_url: &Url,
    rule: &AirportRule,
) -> Result<Vec<Airport>, FetchError> {
    let html = fetcher.fetch(index_url.as_str()).await?;
    let airports = rule.extract(&html);
    if airports.is_empty() {
        warn!(bytes = html.len(), "Index page produced no airports");
    }
    info!(count = airports.len(), "Indexed airports");
    Ok(airports)
}

/// Fetch each airport's detail page and attach its terminals.
///
/// Failures are logged and counted; the affected airport keeps an empty
/// terminal list. `concurrency` is clamped to at least 1.
#[instrument(level = "info", skip_all, fields(airports = airports.len(), concurrency = concurrency))]
pub async fn populate_terminals<F: PageFetch>(
    fetcher: &F,
    base_url: &Url,
    airports: &mut [Airport],
    rule: &TerminalRule,
    concurrency: usize,
) -> TerminalStats {
    let results: Vec<Result<Vec<Terminal>, Box<dyn Error>>> = stream::iter(airports.iter())
        .map(|airport| fetch_terminals(fetcher, base_url, airport, rule))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut stats = TerminalStats::default();
    for (airport, result) in airports.iter_mut().zip(results) {
        match result {
            Ok(terminals) => {
                debug!(airport = %airport.name, count = terminals.len(), "Attached terminals");
                airport.terminals = terminals;
                stats.fetched += 1;
            }
            Err(e) => {
                warn!(airport = %airport.name, url = %airport.url, error = %e, "Failed to fetch airport page; terminals left empty");
                stats.failed += 1;
            }
        }
    }

    info!(fetched = stats.fetched, failed = stats.failed, "Terminal stage complete");
    stats
}

/// Fetch one airport's detail page and extract its terminals.
async fn fetch_terminals<F: PageFetch>(
    fetcher: &F,
    base_url: &Url,
    airport: &Airport,
    rule: &TerminalRule,
) -> Result<Vec<Terminal>, Box<dyn Error>> {
    let detail_url = base_url.join(&airport.url)?;
    let html = fetcher.fetch(detail_url.as_str()).await?;
    Ok(rule.extract(&html))
}

/// Run the whole pipeline and stamp the result with the local date and time.
///
/// # Errors
///
/// Only an index page failure is returned; per-airport failures are absorbed
/// by [`populate_terminals`].
#[instrument(level = "info", skip_all, fields(source = %source.index_url))]
pub async fn build_catalogue<F: PageFetch>(
    fetcher: &F,
    source: &Source,
    rules: &Rules,
    options: PipelineOptions,
) -> Result<Catalogue, FetchError> {
    let t0 = Instant::now();
    let now = Local::now();

    let mut airports = index_airports(fetcher, &source.index_url, &rules.airports).await?;

    if options.populate_terminals {
        populate_terminals(
            fetcher,
            &source.base_url,
            &mut airports,
            &rules.terminals,
            options.concurrency,
        )
        .await;
    } else {
        info!("Skipping terminal stage");
    }

    let catalogue = Catalogue {
        source: source.index_url.to_string(),
        local_date: now.date_naive().to_string(),
        local_time: now.time().to_string(),
        airports,
    };

    info!(
        airports = catalogue.airports.len(),
        with_terminals = catalogue.airports_with_terminals(),
        terminals = catalogue.terminal_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Catalogue built"
    );
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::fetch::FetchStage;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use std::time::Duration;

    const BASE: &str = "https://lounges.test";

    /// Serves canned pages; unknown URLs fail with a request error.
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        delays_ms: HashMap<String, u64>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn page(mut self, path: &str, html: impl Into<String>) -> Self {
            self.pages.insert(format!("{BASE}{path}"), html.into());
            self
        }

        fn delay(mut self, path: &str, ms: u64) -> Self {
            self.delays_ms.insert(format!("{BASE}{path}"), ms);
            self
        }
    }

    impl PageFetch for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            if let Some(ms) = self.delays_ms.get(url) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.pages.get(url).cloned().ok_or_else(|| {
                FetchError::new(
                    url,
                    FetchStage::Request,
                    io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
                )
            })
        }
    }

    fn anchor(href: &str, text: &str) -> String {
        format!(
            r#"<a class="link-arrow thin" href="{href}">{text}<span class="icon-caret-right"></span></a>"#
        )
    }

    fn terminal_block(name: &str) -> String {
        format!(
            r#"<div class="terminal-name "><div class="terminal-name-text">{name}</div></div>"#
        )
    }

    fn index_html() -> String {
        [
            anchor("/lounges/united-kingdom/london-heathrow", "Heathrow"),
            anchor("/lounges/united-states/new-york-jfk", "John F. Kennedy"),
            anchor("/lounges/united-states/new-york/jfk-terminal-1", "Nested"),
            anchor("/lounges/france/paris-cdg", "Charles de Gaulle"),
        ]
        .join("\n")
    }

    fn source() -> Source {
        Source::new(BASE, "/airport-lounges").unwrap()
    }

    fn rules() -> Rules {
        RulesConfig::default().compile().unwrap()
    }

    fn terminal_names(airport: &Airport) -> Vec<&str> {
        airport.terminals.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_source_resolves_index_url() {
        let source = source();
        assert_eq!(source.index_url.as_str(), "https://lounges.test/airport-lounges");
    }

    #[test]
    fn test_source_rejects_relative_base() {
        assert!(Source::new("lounges.test", "/airport-lounges").is_err());
    }

    #[tokio::test]
    async fn test_index_failure_is_fatal() {
        let fetcher = FakeFetcher::default();
        let err = build_catalogue(&fetcher, &source(), &rules(), PipelineOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.url, "https://lounges.test/airport-lounges");
        assert_eq!(fetcher.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_builds_catalogue_in_extraction_order() {
        let fetcher = FakeFetcher::default()
            .page("/airport-lounges", index_html())
            .page(
                "/lounges/united-kingdom/london-heathrow",
                format!("{}{}", terminal_block("Terminal 3"), terminal_block("Terminal 5")),
            )
            .page(
                "/lounges/united-states/new-york-jfk",
                terminal_block(" Terminal 4 "),
            )
            .page("/lounges/france/paris-cdg", "<html></html>");

        let catalogue = build_catalogue(&fetcher, &source(), &rules(), PipelineOptions::default())
            .await
            .unwrap();

        let names: Vec<&str> = catalogue.airports.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Heathrow", "John F. Kennedy", "Charles de Gaulle"]);
        assert_eq!(terminal_names(&catalogue.airports[0]), vec!["Terminal 3", "Terminal 5"]);
        assert_eq!(terminal_names(&catalogue.airports[1]), vec!["Terminal 4"]);
        assert!(catalogue.airports[2].terminals.is_empty());
        assert_eq!(catalogue.source, "https://lounges.test/airport-lounges");

        let calls = fetcher.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                "https://lounges.test/airport-lounges",
                "https://lounges.test/lounges/united-kingdom/london-heathrow",
                "https://lounges.test/lounges/united-states/new-york-jfk",
                "https://lounges.test/lounges/france/paris-cdg",
            ]
        );
    }

    #[tokio::test]
    async fn test_detail_failure_does_not_stop_later_airports() {
        // Heathrow's detail page is missing, so its fetch fails.
        let fetcher = FakeFetcher::default()
            .page("/airport-lounges", index_html())
            .page(
                "/lounges/united-states/new-york-jfk",
                terminal_block("Terminal 4"),
            )
            .page("/lounges/france/paris-cdg", terminal_block("Terminal 2E"));

        let mut airports = index_airports(&fetcher, &source().index_url, &rules().airports)
            .await
            .unwrap();
        let stats = populate_terminals(
            &fetcher,
            &source().base_url,
            &mut airports,
            &rules().terminals,
            1,
        )
        .await;

        assert_eq!(stats, TerminalStats { fetched: 2, failed: 1 });
        assert!(airports[0].terminals.is_empty());
        assert_eq!(terminal_names(&airports[1]), vec!["Terminal 4"]);
        assert_eq!(terminal_names(&airports[2]), vec!["Terminal 2E"]);
    }

    #[tokio::test]
    async fn test_skip_terminals_fetches_only_the_index() {
        let fetcher = FakeFetcher::default().page("/airport-lounges", index_html());
        let options = PipelineOptions {
            populate_terminals: false,
            ..PipelineOptions::default()
        };

        let catalogue = build_catalogue(&fetcher, &source(), &rules(), options)
            .await
            .unwrap();

        assert_eq!(catalogue.airports.len(), 3);
        assert_eq!(catalogue.terminal_count(), 0);
        assert_eq!(fetcher.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_keep_airport_order() {
        let fetcher = FakeFetcher::default()
            .page("/airport-lounges", index_html())
            .page(
                "/lounges/united-kingdom/london-heathrow",
                terminal_block("Terminal 5"),
            )
            .delay("/lounges/united-kingdom/london-heathrow", 30)
            .page(
                "/lounges/united-states/new-york-jfk",
                terminal_block("Terminal 4"),
            )
            .delay("/lounges/united-states/new-york-jfk", 10)
            .page("/lounges/france/paris-cdg", terminal_block("Terminal 2E"));
        let options = PipelineOptions {
            populate_terminals: true,
            concurrency: 3,
        };

        let catalogue = build_catalogue(&fetcher, &source(), &rules(), options)
            .await
            .unwrap();

        assert_eq!(terminal_names(&catalogue.airports[0]), vec!["Terminal 5"]);
        assert_eq!(terminal_names(&catalogue.airports[1]), vec!["Terminal 4"]);
        assert_eq!(terminal_names(&catalogue.airports[2]), vec!["Terminal 2E"]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let fetcher = FakeFetcher::default()
            .page("/airport-lounges", index_html())
            .page("/lounges/france/paris-cdg", terminal_block("Terminal 1"));
        let mut airports = index_airports(&fetcher, &source().index_url, &rules().airports)
            .await
            .unwrap();

        let stats = populate_terminals(
            &fetcher,
            &source().base_url,
            &mut airports,
            &rules().terminals,
            0,
        )
        .await;

        assert_eq!(stats, TerminalStats { fetched: 1, failed: 2 });
        assert_eq!(terminal_names(&airports[2]), vec!["Terminal 1"]);
    }

    #[tokio::test]
    async fn test_empty_index_is_not_an_error() {
        let fetcher = FakeFetcher::default().page("/airport-lounges", "<html><body></body></html>");
        let catalogue = build_catalogue(&fetcher, &source(), &rules(), PipelineOptions::default())
            .await
            .unwrap();
        assert!(catalogue.airports.is_empty());
    }
}
