//! Data models for the lounge catalogue.
//!
//! This module defines the records produced by the extraction pipeline:
//! - [`Airport`]: One airport entry from the index page, with its location
//!   inferred from the URL and the terminals found on its detail page
//! - [`Terminal`]: One physical terminal listed on an airport's detail page
//! - [`Catalogue`]: The full result of a single run, used for JSON snapshots

use serde::{Deserialize, Serialize};

/// An airport listed on the lounge index page.
///
/// Airports are created by the airport extraction rule with an empty
/// `terminals` list. The list is filled in at most once, after the airport's
/// detail page has been fetched successfully.
///
/// # Fields
///
/// * `name` - Display name as shown in the index link (trimmed, never empty)
/// * `url` - Relative path of the airport's detail page, e.g. `/lounges/united-states/new-york-jfk`
/// * `country` - Title-cased country inferred from the URL (may be empty)
/// * `city` - Title-cased city/airport slug inferred from the URL (may be empty)
/// * `terminals` - Terminals in the order they appear on the detail page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Airport {
    /// The display name of the airport.
    pub name: String,
    /// The relative URL of the airport's detail page.
    pub url: String,
    /// The country inferred from the URL.
    pub country: String,
    /// The city inferred from the URL, including the airport suffix.
    pub city: String,
    /// The terminals serving this airport.
    pub terminals: Vec<Terminal>,
}

impl Airport {
    /// Create an airport with no terminals yet.
    pub fn new(name: String, url: String, country: String, city: String) -> Self {
        Self {
            name,
            url,
            country,
            city,
            terminals: Vec::new(),
        }
    }
}

/// A terminal listed on an airport's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Terminal {
    /// The terminal name with surrounding whitespace removed.
    pub name: String,
}

/// Every airport collected in one run.
///
/// Each execution of the application produces one `Catalogue`, which is
/// printed as a text report and optionally written as JSON.
#[derive(Debug, Deserialize, Serialize)]
pub struct Catalogue {
    /// Absolute URL of the index page the airports were read from.
    pub source: String,
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of the run in `HH:MM:SS.microseconds` format.
    pub local_time: String,
    /// Airports in extraction order.
    pub airports: Vec<Airport>,
}

impl Catalogue {
    /// Number of airports whose terminal list is non-empty.
    pub fn airports_with_terminals(&self) -> usize {
        self.airports
            .iter()
            .filter(|a| !a.terminals.is_empty())
            .count()
    }

    /// Total number of terminals across all airports.
    pub fn terminal_count(&self) -> usize {
        self.airports.iter().map(|a| a.terminals.len()).sum()
    }
}
