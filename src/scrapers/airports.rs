//! Airport extraction from the lounge index page.
//!
//! The index page lists every airport as a row link shaped like:
//!
//! ```html
//! <a class="link-arrow thin ..." href="/lounges/united-states/new-york-jfk">
//!     John F. Kennedy <span class="icon-caret-right"></span>
//! </a>
//! ```
//!
//! The same link style is also used for individual lounge pages nested one
//! level deeper (`/lounges/<country>/<city>/<lounge>`). Those are filtered out
//! by counting path separators.

use super::{ExtractionRule, compile_pattern};
use crate::location::infer_location;
use crate::models::Airport;
use regex::Regex;
use std::error::Error;
use tracing::{debug, instrument};

/// Compiled rule for airport rows on the index page.
#[derive(Debug, Clone)]
pub struct AirportRule {
    pattern: Regex,
    max_path_separators: usize,
}

impl AirportRule {
    /// Compile an airport rule.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Regex with named groups `url` and `name`
    /// * `max_path_separators` - Links whose URL has more `/` characters than
    ///   this are treated as sub-pages and skipped
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile or lacks a required
    /// capture group.
    pub fn new(pattern: &str, max_path_separators: usize) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            pattern: compile_pattern(pattern, &["url", "name"])?,
            max_path_separators,
        })
    }

    /// Whether a matched link points at an airport-level page.
    fn is_airport_level(&self, url: &str) -> bool {
        url.matches('/').count() <= self.max_path_separators
    }
}

impl ExtractionRule for AirportRule {
    type Record = Airport;

    #[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
    fn extract(&self, html: &str) -> Vec<Airport> {
        let mut airports = Vec::new();
        let mut skipped = 0usize;

        for caps in self.pattern.captures_iter(html) {
            let (Some(url), Some(name)) = (caps.name("url"), caps.name("name")) else {
                continue;
            };
            let url = url.as_str();
            let name = name.as_str().trim();

            if name.is_empty() || !self.is_airport_level(url) {
                skipped += 1;
                continue;
            }

            let (country, city) = infer_location(url);
            airports.push(Airport::new(
                name.to_string(),
                url.to_string(),
                country,
                city,
            ));
        }

        debug!(count = airports.len(), skipped, "Extracted airports");
        airports
    }
}
